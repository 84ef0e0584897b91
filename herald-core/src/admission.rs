//! Admission controller.
//!
//! Decides, for every inbound delivery, whether it is new work or a repeat of
//! something already relayed:
//!
//! 1. Parse the raw body. A parse failure touches nothing: it is neither
//!    remembered nor treated as a duplicate, so a corrected retry goes through.
//! 2. Claim the event's request id in the [`DedupCache`]. A recorded or
//!    in-flight id is a duplicate, acknowledged without relaying.
//! 3. Relay through the [`RelayDispatcher`]. Success records the id for the
//!    dedup window; failure releases the claim so the sender's retry is
//!    relayed again.
//!
//! Per request id at most one delivery is in the relay step at any time and
//! at most one success is recorded per window.

use crate::dedup::{Claim, DedupCache};
use crate::relay::{Destination, RelayDispatcher, RelayError};
use bytes::Bytes;
use herald_sdk::{ParseError, RequestId, parse_event};
use kanau::processor::Processor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// One inbound delivery: where it should go and the raw body.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub destination: Destination,
    pub body: Bytes,
}

/// How a delivery was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayOutcome {
    Forwarded,
    SkippedDuplicate,
    ParseError,
    RelayError,
}

impl RelayOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayOutcome::Forwarded => "forwarded",
            RelayOutcome::SkippedDuplicate => "skipped-duplicate",
            RelayOutcome::ParseError => "parse-error",
            RelayOutcome::RelayError => "relay-error",
        }
    }
}

impl std::fmt::Display for RelayOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful admission results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admitted {
    /// The event was relayed; `confirmation` is what the notifier reported.
    Forwarded {
        request_id: RequestId,
        confirmation: String,
    },
    /// The event was relayed earlier (or is being relayed right now).
    SkippedDuplicate { request_id: RequestId },
}

impl Admitted {
    pub fn outcome(&self) -> RelayOutcome {
        match self {
            Admitted::Forwarded { .. } => RelayOutcome::Forwarded,
            Admitted::SkippedDuplicate { .. } => RelayOutcome::SkippedDuplicate,
        }
    }

    pub fn request_id(&self) -> &RequestId {
        match self {
            Admitted::Forwarded { request_id, .. } => request_id,
            Admitted::SkippedDuplicate { request_id } => request_id,
        }
    }
}

/// Failed admission results.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The body is not a valid event envelope.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The event was new but could not be relayed.
    #[error("{source}")]
    Relay {
        request_id: RequestId,
        source: RelayError,
    },
}

impl AdmissionError {
    pub fn outcome(&self) -> RelayOutcome {
        match self {
            AdmissionError::Parse(_) => RelayOutcome::ParseError,
            AdmissionError::Relay { .. } => RelayOutcome::RelayError,
        }
    }
}

/// Owns the dedup cache and drives the relay for new events.
#[derive(Clone)]
pub struct AdmissionController {
    cache: Arc<DedupCache>,
    dispatcher: RelayDispatcher,
}

impl AdmissionController {
    pub fn new(cache: Arc<DedupCache>, dispatcher: RelayDispatcher) -> Self {
        Self { cache, dispatcher }
    }

    pub fn cache(&self) -> &Arc<DedupCache> {
        &self.cache
    }
}

impl Processor<Delivery> for AdmissionController {
    type Output = Admitted;
    type Error = AdmissionError;

    #[tracing::instrument(skip_all, name = "admission", fields(destination = %delivery.destination))]
    async fn process(&self, delivery: Delivery) -> Result<Admitted, AdmissionError> {
        let event = parse_event(&delivery.body).inspect_err(|e| {
            warn!(error = %e, "Error parsing event");
        })?;
        let request_id = event.request_id.clone();

        let guard = match self.cache.try_claim(&request_id) {
            Claim::Acquired(guard) => guard,
            Claim::Recorded => {
                info!(%request_id, event = %event.name, "Skipping event as already processed");
                return Ok(Admitted::SkippedDuplicate { request_id });
            }
            Claim::InFlight => {
                info!(%request_id, event = %event.name, "Skipping event as already in flight");
                return Ok(Admitted::SkippedDuplicate { request_id });
            }
        };

        match self.dispatcher.dispatch(&delivery.destination, &event).await {
            Ok(confirmation) => {
                guard.commit();
                info!(%request_id, event = %event.name, "Event relayed");
                Ok(Admitted::Forwarded {
                    request_id,
                    confirmation,
                })
            }
            Err(source) => {
                drop(guard);
                error!(%request_id, event = %event.name, error = %source, "Failed to relay event");
                Err(AdmissionError::Relay { request_id, source })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::dedup::DEFAULT_TTL;
    use crate::relay::Notifier;
    use async_trait::async_trait;
    use herald_sdk::Event;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts calls; fails while `failing` is set.
    #[derive(Default)]
    struct FakeNotifier {
        calls: AtomicUsize,
        failing: AtomicBool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn notify(&self, _credential: &str, event: &Event) -> Result<String, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(RelayError::Rejected("no_service".into()));
            }
            Ok(format!("relayed {}", event.name))
        }
    }

    struct Harness {
        clock: Arc<ManualClock>,
        notifier: Arc<FakeNotifier>,
        controller: AdmissionController,
    }

    fn harness(notifier: FakeNotifier) -> Harness {
        let clock = Arc::new(ManualClock::new());
        let notifier = Arc::new(notifier);
        let cache = Arc::new(DedupCache::new(DEFAULT_TTL, clock.clone()));
        let controller = AdmissionController::new(cache, RelayDispatcher::new(notifier.clone()));
        Harness {
            clock,
            notifier,
            controller,
        }
    }

    fn delivery(body: &'static str) -> Delivery {
        Delivery {
            destination: Destination::new("T1", "T2", "T3"),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    const RENEW: &str = r#"{"request_id":"abc123","name":"domain.renew"}"#;

    #[tokio::test]
    async fn second_delivery_is_skipped() {
        let h = harness(FakeNotifier::default());

        let first = h.controller.process(delivery(RENEW)).await.unwrap();
        assert_eq!(
            first,
            Admitted::Forwarded {
                request_id: "abc123".into(),
                confirmation: "relayed domain.renew".into(),
            }
        );

        let second = h.controller.process(delivery(RENEW)).await.unwrap();
        assert_eq!(second.outcome(), RelayOutcome::SkippedDuplicate);
        assert_eq!(second.request_id().as_str(), "abc123");
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn relayed_again_after_window() {
        let h = harness(FakeNotifier::default());

        h.controller.process(delivery(RENEW)).await.unwrap();
        h.clock.advance(Duration::from_secs(299));
        let within = h.controller.process(delivery(RENEW)).await.unwrap();
        assert_eq!(within.outcome(), RelayOutcome::SkippedDuplicate);

        h.clock.advance(Duration::from_secs(1));
        let after = h.controller.process(delivery(RENEW)).await.unwrap();
        assert_eq!(after.outcome(), RelayOutcome::Forwarded);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn malformed_body_never_touches_cache() {
        let h = harness(FakeNotifier::default());

        for _ in 0..2 {
            let err = h
                .controller
                .process(delivery(r#"{"request_id":"abc123"}"#))
                .await
                .unwrap_err();
            assert_eq!(err.outcome(), RelayOutcome::ParseError);
        }

        assert!(h.controller.cache().is_empty());
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 0);

        // The corrected retry is relayed.
        let fixed = h.controller.process(delivery(RENEW)).await.unwrap();
        assert_eq!(fixed.outcome(), RelayOutcome::Forwarded);
    }

    #[tokio::test]
    async fn relay_failure_does_not_poison_retry() {
        let h = harness(FakeNotifier::default());
        h.notifier.failing.store(true, Ordering::SeqCst);

        let err = h.controller.process(delivery(RENEW)).await.unwrap_err();
        assert_eq!(err.outcome(), RelayOutcome::RelayError);
        assert_eq!(err.to_string(), "destination rejected message: no_service");
        assert!(!h.controller.cache().contains(&"abc123".into()));
        assert_eq!(h.controller.cache().in_flight(), 0);

        h.notifier.failing.store(false, Ordering::SeqCst);
        let retry = h.controller.process(delivery(RENEW)).await.unwrap();
        assert_eq!(retry.outcome(), RelayOutcome::Forwarded);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicates_forward_once() {
        let h = harness(FakeNotifier {
            delay: Some(Duration::from_millis(50)),
            ..FakeNotifier::default()
        });

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let controller = h.controller.clone();
                tokio::spawn(async move { controller.process(delivery(RENEW)).await })
            })
            .collect();

        let mut forwarded = 0;
        let mut skipped = 0;
        for task in tasks {
            match task.await.unwrap().unwrap().outcome() {
                RelayOutcome::Forwarded => forwarded += 1,
                RelayOutcome::SkippedDuplicate => skipped += 1,
                other => panic!("unexpected outcome {other}"),
            }
        }

        assert_eq!(forwarded, 1);
        assert_eq!(skipped, 15);
        assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(RelayOutcome::Forwarded.to_string(), "forwarded");
        assert_eq!(RelayOutcome::SkippedDuplicate.as_str(), "skipped-duplicate");
        assert_eq!(RelayOutcome::ParseError.as_str(), "parse-error");
        assert_eq!(RelayOutcome::RelayError.as_str(), "relay-error");
    }
}
