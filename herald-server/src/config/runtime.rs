//! Runtime configuration types.
//!
//! The dedup and Slack sections are defined in `herald-core::config` and
//! re-exported here; the listen address only matters to the server.

pub use herald_core::config::{DedupConfig, SlackConfig};

use std::net::SocketAddr;

/// Server configuration with runtime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
}
