//! Relay dispatcher.
//!
//! Turns a [`Destination`] into a credential and hands the event to the
//! configured [`Notifier`]. Failures are returned as-is; retrying is the
//! sender's job, and admission makes sure a retry is not mistaken for a
//! duplicate.

use super::destination::Destination;
use super::notifier::{Notifier, RelayError};
use herald_sdk::Event;
use std::sync::Arc;

#[derive(Clone)]
pub struct RelayDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl RelayDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn dispatch(
        &self,
        destination: &Destination,
        event: &Event,
    ) -> Result<String, RelayError> {
        let credential = destination.credential();
        self.notifier.notify(&credential, event).await
    }
}
