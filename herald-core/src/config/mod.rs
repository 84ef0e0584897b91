//! Configuration types for Herald.
//!
//! These types represent the validated runtime configuration consumed by the
//! core. Loading and parsing is handled by the server crate.

mod dedup;
mod slack;

pub use dedup::{DEFAULT_SWEEP_INTERVAL, DedupConfig};
pub use slack::SlackConfig;
