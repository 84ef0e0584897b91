//! TOML file configuration structures.
//!
//! These structs directly map to the optional `herald.toml` file. Every
//! section and field has a default, so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

/// Dedup cache section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Seconds a relayed event is remembered.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Seconds between sweeps of expired entries.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Slack destination section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Root of the incoming-webhook host.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bot name shown on posted messages.
    #[serde(default = "default_username")]
    pub username: String,
    /// Avatar shown on posted messages.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: default_username(),
            icon_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    herald_sdk::client::DEFAULT_SLACK_URL.to_string()
}

fn default_username() -> String {
    crate::WHAT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
