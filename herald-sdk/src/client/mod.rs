//! HTTP clients for outbound chat destinations.
//!
//! Gated behind the `client` cargo feature so crates that only need the
//! envelope types do not pull in `reqwest`.

mod slack;

pub use slack::{DEFAULT_SLACK_URL, SlackClient};

use reqwest::StatusCode;

/// Errors produced by the outbound HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The destination returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// The credential does not name a webhook under `services/`.
    #[error("invalid webhook credential: {0}")]
    InvalidCredential(&'static str),

    /// The credential could not be joined onto the base URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
