//! Dedup window configuration.

use crate::dedup::DEFAULT_TTL;
use std::time::Duration;

/// Default interval between sweeps of expired dedup entries.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Dedup cache configuration with runtime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupConfig {
    /// How long a relayed event is remembered.
    pub ttl: Duration,
    /// How often expired entries are reclaimed.
    pub sweep_interval: Duration,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}
