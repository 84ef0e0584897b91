//! Relay: destinations, the notifier seam, and the dispatcher tying them together.

pub mod destination;
pub mod dispatcher;
pub mod notifier;

pub use destination::Destination;
pub use dispatcher::RelayDispatcher;
pub use notifier::{Notifier, RelayError, SlackNotifier};
