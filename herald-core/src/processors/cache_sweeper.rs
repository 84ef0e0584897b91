//! CacheSweeper processor.
//!
//! Expired dedup entries already read as absent; this task only reclaims
//! their memory. It wakes every `sweep_interval`, purges, and exits when the
//! shutdown signal fires.

use crate::dedup::DedupCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

pub struct CacheSweeper {
    cache: Arc<DedupCache>,
    interval: Duration,
}

impl CacheSweeper {
    pub fn new(cache: Arc<DedupCache>, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// Run until `shutdown_rx` turns `true` or its sender is dropped.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(interval = ?self.interval, "CacheSweeper started");

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("CacheSweeper received shutdown signal");
                        break;
                    }
                }

                _ = tokio::time::sleep(self.interval) => {
                    self.sweep();
                }
            }
        }

        info!("CacheSweeper shutdown complete");
    }

    /// Purge expired entries once.
    pub fn sweep(&self) -> usize {
        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!(purged, remaining = self.cache.len(), "Purged expired dedup entries");
        }
        purged
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::dedup::DEFAULT_TTL;
    use herald_sdk::RequestId;

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_interval_and_stops_on_shutdown() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(DedupCache::new(DEFAULT_TTL, clock.clone()));
        cache.insert(RequestId::from("a"));
        cache.insert(RequestId::from("b"));
        clock.advance(DEFAULT_TTL);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = CacheSweeper::new(cache.clone(), Duration::from_secs(60));
        let handle = tokio::spawn(sweeper.run(shutdown_rx));

        assert_eq!(cache.len(), 2);
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(cache.len(), 0);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_sender_dropped() {
        let cache = Arc::new(DedupCache::with_ttl(DEFAULT_TTL));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(CacheSweeper::new(cache, Duration::from_secs(3600)).run(shutdown_rx));

        drop(shutdown_tx);
        handle.await.unwrap();
    }

    #[test]
    fn sweep_keeps_live_entries() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(DedupCache::new(DEFAULT_TTL, clock.clone()));
        cache.insert(RequestId::from("live"));
        clock.advance(Duration::from_secs(10));

        let sweeper = CacheSweeper::new(cache.clone(), Duration::from_secs(60));
        assert_eq!(sweeper.sweep(), 0);
        assert!(cache.contains(&RequestId::from("live")));
    }
}
