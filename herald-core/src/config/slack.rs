//! Slack destination configuration.

use std::time::Duration;
use url::Url;

/// Slack notifier configuration with runtime values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    /// Root of the incoming-webhook host.
    pub base_url: Url,
    /// Bot name shown on posted messages.
    pub username: String,
    /// Optional avatar for posted messages.
    pub icon_url: Option<String>,
    /// Request timeout for a single post.
    pub timeout: Duration,
}
