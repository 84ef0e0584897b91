//! Slack incoming-webhook client.

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::slack::SlackMessage;

/// Default Slack incoming-webhook host.
pub const DEFAULT_SLACK_URL: &str = "https://hooks.slack.com/";

/// Typed HTTP client for Slack incoming webhooks.
///
/// Messages are posted to `{base_url}services/{credential}`, where the
/// credential is the `T…/B…/…` triple Slack hands out per webhook.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    base_url: Url,
    username: Option<String>,
    icon_url: Option<String>,
}

impl SlackClient {
    /// Create a new `SlackClient`.
    ///
    /// * `base_url` – root URL of the webhook host. Must end with `/` if it
    ///   carries a path prefix.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
            username: None,
            icon_url: None,
        }
    }

    /// Replace the default `reqwest::Client` (e.g. to configure timeouts).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Post messages under this bot name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Post messages with this avatar.
    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    /// Resolve the webhook URL for a credential.
    ///
    /// Segments may only hold ASCII letters, digits, `-`, `_` and `.`, and
    /// may not be `.` or `..`, so the result always stays under `services/`.
    pub fn webhook_url(&self, credential: &str) -> Result<Url, ClientError> {
        validate_credential(credential)?;
        Ok(self.base_url.join(&format!("services/{credential}"))?)
    }

    /// Post `text` to the webhook identified by `credential`.
    ///
    /// Returns the response body Slack sent back (usually `ok`).
    pub async fn post_message(&self, credential: &str, text: &str) -> Result<String, ClientError> {
        let url = self.webhook_url(credential)?;
        let message = SlackMessage {
            text: text.to_string(),
            username: self.username.clone(),
            icon_url: self.icon_url.clone(),
        };

        let resp = self.http.post(url).json(&message).send().await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ClientError::Api { status, body });
        }
        Ok(body)
    }
}

fn validate_credential(credential: &str) -> Result<(), ClientError> {
    for segment in credential.split('/') {
        if segment == "." || segment == ".." {
            return Err(ClientError::InvalidCredential("dot segment"));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ClientError::InvalidCredential("unexpected character"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_url_appends_credential() {
        let client = SlackClient::new(Url::parse(DEFAULT_SLACK_URL).unwrap());
        let url = client.webhook_url("T1/T2/T3").unwrap();
        assert_eq!(url.as_str(), "https://hooks.slack.com/services/T1/T2/T3");
    }

    #[test]
    fn webhook_url_keeps_path_prefix() {
        let client = SlackClient::new(Url::parse("http://127.0.0.1:9000/mock/").unwrap());
        let url = client.webhook_url("a/b/c").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mock/services/a/b/c");
    }

    #[test]
    fn webhook_url_rejects_dot_segments() {
        let client = SlackClient::new(Url::parse(DEFAULT_SLACK_URL).unwrap());
        for credential in ["../../api", "T1/T2/../../../chat.postMessage", "T1/./T3"] {
            assert!(
                matches!(
                    client.webhook_url(credential),
                    Err(ClientError::InvalidCredential("dot segment"))
                ),
                "{credential} was accepted"
            );
        }
    }

    #[test]
    fn webhook_url_rejects_query_and_escapes() {
        let client = SlackClient::new(Url::parse(DEFAULT_SLACK_URL).unwrap());
        for credential in ["T1/T2/T3?x=1", "T1/T2/T3#frag", "T1/%2e%2e/T3", "T1\\..\\T3"] {
            assert!(
                matches!(
                    client.webhook_url(credential),
                    Err(ClientError::InvalidCredential("unexpected character"))
                ),
                "{credential} was accepted"
            );
        }
    }

    #[test]
    fn webhook_url_allows_dots_inside_segments_and_empty_segments() {
        let client = SlackClient::new(Url::parse(DEFAULT_SLACK_URL).unwrap());
        let url = client.webhook_url("T1//v1.2").unwrap();
        assert_eq!(url.as_str(), "https://hooks.slack.com/services/T1//v1.2");
    }

    #[test]
    fn message_omits_unset_fields() {
        let json = serde_json::to_value(SlackMessage::new("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hi"}));
    }
}
