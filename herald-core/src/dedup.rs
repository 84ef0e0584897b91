//! Time-windowed dedup cache.
//!
//! Remembers which event deliveries have already been relayed. An entry is
//! visible during `[inserted_at, inserted_at + ttl)` and behaves as absent
//! afterwards, whether or not a sweep has physically removed it yet.
//!
//! Besides the plain `contains` / `insert` membership contract the cache
//! tracks in-flight claims, so that two concurrent deliveries of the same
//! event cannot both reach the relay step. A claim is held by a
//! [`ClaimGuard`]; dropping the guard without committing it releases the
//! claim and leaves the key eligible for a later retry.

use crate::clock::{Clock, SystemClock};
use herald_sdk::RequestId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// How long a relayed event is remembered.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

pub struct DedupCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Recorded keys and the instant they stop being visible.
    recorded: HashMap<RequestId, Instant>,
    /// Keys currently being relayed by some request.
    in_flight: HashSet<RequestId>,
}

/// Result of [`DedupCache::try_claim`].
#[derive(Debug)]
pub enum Claim<'a> {
    /// The key is new; the caller owns it until the guard is committed or dropped.
    Acquired(ClaimGuard<'a>),
    /// The key was already relayed inside the window.
    Recorded,
    /// Another request is relaying the key right now.
    InFlight,
}

impl DedupCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// A cache on the real clock with the given window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `key` was recorded less than `ttl` ago.
    pub fn contains(&self, key: &RequestId) -> bool {
        let now = self.clock.now();
        self.lock()
            .recorded
            .get(key)
            .is_some_and(|expires_at| now < *expires_at)
    }

    /// Record `key` with a fresh window, replacing any earlier entry.
    pub fn insert(&self, key: RequestId) {
        let expires_at = self.clock.now() + self.ttl;
        self.lock().recorded.insert(key, expires_at);
    }

    /// Atomically check `key` and, if it is neither recorded nor in flight,
    /// mark it in flight.
    pub fn try_claim(&self, key: &RequestId) -> Claim<'_> {
        let now = self.clock.now();
        let mut inner = self.lock();

        if inner
            .recorded
            .get(key)
            .is_some_and(|expires_at| now < *expires_at)
        {
            return Claim::Recorded;
        }
        if !inner.in_flight.insert(key.clone()) {
            return Claim::InFlight;
        }

        Claim::Acquired(ClaimGuard {
            cache: self,
            key: Some(key.clone()),
        })
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.lock();
        let before = inner.recorded.len();
        inner.recorded.retain(|_, expires_at| now < *expires_at);
        before - inner.recorded.len()
    }

    /// Number of stored entries. Expired entries count until purged.
    pub fn len(&self) -> usize {
        self.lock().recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys currently claimed by in-flight requests.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    fn commit(&self, key: RequestId) {
        let expires_at = self.clock.now() + self.ttl;
        let mut inner = self.lock();
        inner.in_flight.remove(&key);
        inner.recorded.insert(key, expires_at);
    }

    fn release(&self, key: &RequestId) {
        self.lock().in_flight.remove(key);
    }
}

impl std::fmt::Debug for DedupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("DedupCache")
            .field("ttl", &self.ttl)
            .field("recorded", &inner.recorded.len())
            .field("in_flight", &inner.in_flight.len())
            .finish()
    }
}

/// Exclusive right to relay one key.
///
/// [`commit`](ClaimGuard::commit) records the key; dropping the guard
/// releases it unrecorded. The drop path also covers the request future
/// being cancelled mid-relay.
#[derive(Debug)]
pub struct ClaimGuard<'a> {
    cache: &'a DedupCache,
    key: Option<RequestId>,
}

impl ClaimGuard<'_> {
    /// Record the key as relayed.
    pub fn commit(mut self) {
        if let Some(key) = self.key.take() {
            self.cache.commit(key);
        }
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.cache.release(&key);
        }
    }
}
