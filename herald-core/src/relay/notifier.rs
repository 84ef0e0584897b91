//! Outbound notifier seam.
//!
//! A [`Notifier`] formats an event and delivers it to whatever a credential
//! points at. The relay dispatcher only knows this trait, so new destination
//! kinds plug in without touching admission.

use crate::config::SlackConfig;
use async_trait::async_trait;
use herald_sdk::Event;
use herald_sdk::client::{ClientError, SlackClient};
use herald_sdk::format_message;
use thiserror::Error;
use tracing::debug;

/// Errors raised while delivering a message.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound HTTP client failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The destination answered with a non-2xx status.
    #[error("destination rejected message: {0}")]
    Rejected(String),
}

/// Formats and delivers events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `event` to the destination named by `credential`.
    ///
    /// Returns confirmation text describing what was sent.
    async fn notify(&self, credential: &str, event: &Event) -> Result<String, RelayError>;
}

/// Posts events to Slack incoming webhooks.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: SlackClient,
}

impl SlackNotifier {
    pub fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Build a notifier from runtime configuration.
    pub fn from_config(config: &SlackConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut client = SlackClient::new(config.base_url.clone())
            .with_http_client(http)
            .with_username(config.username.clone());
        if let Some(icon_url) = &config.icon_url {
            client = client.with_icon_url(icon_url.clone());
        }
        Self { client }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, credential: &str, event: &Event) -> Result<String, RelayError> {
        let text = format_message(event);
        let response = self
            .client
            .post_message(credential, &text)
            .await
            .map_err(classify)?;
        debug!(request_id = %event.request_id, %response, "Slack accepted message");
        Ok(text)
    }
}

/// Slack refusals carry their reason (`invalid_token`, `no_service`, ...) in
/// the response body.
fn classify(err: ClientError) -> RelayError {
    match err {
        ClientError::Api { status, body } if body.trim().is_empty() => {
            RelayError::Rejected(status.to_string())
        }
        ClientError::Api { body, .. } => RelayError::Rejected(body),
        other => RelayError::Client(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn slack_refusal_becomes_rejection() {
        let err = classify(ClientError::Api {
            status: StatusCode::FORBIDDEN,
            body: "invalid_token".to_string(),
        });
        assert!(matches!(err, RelayError::Rejected(ref reason) if reason == "invalid_token"));
        assert_eq!(err.to_string(), "destination rejected message: invalid_token");
    }

    #[test]
    fn empty_refusal_reports_status() {
        let err = classify(ClientError::Api {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        });
        assert!(matches!(err, RelayError::Rejected(ref reason) if reason == "404 Not Found"));
    }

    #[test]
    fn other_client_errors_pass_through() {
        let err = classify(ClientError::InvalidCredential("dot segment"));
        assert!(matches!(
            err,
            RelayError::Client(ClientError::InvalidCredential(_))
        ));
    }

    #[tokio::test]
    async fn escaping_credential_fails_before_sending() {
        let notifier = SlackNotifier::new(SlackClient::new(
            url::Url::parse("http://127.0.0.1:9/").unwrap(),
        ));
        let event = herald_sdk::parse_event(br#"{"request_id":"abc123","name":"domain.renew"}"#)
            .unwrap();
        let err = notifier.notify("../../api", &event).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid webhook credential: dot segment");
    }
}
