//! Inbound event envelope.
//!
//! Mirrors the JSON body DNSimple sends to webhook endpoints:
//!
//! ```text
//! {
//!   "name": "domain.renew",
//!   "api_version": "v2",
//!   "request_identifier": "2d3c9a26-...",
//!   "account": { "id": 1010, "display": "Example", "identifier": "example" },
//!   "actor": { "id": "1", "entity": "user", "pretty": "john@example.com" },
//!   "data": { "domain": { "name": "example.com", ... } }
//! }
//! ```
//!
//! Only `name` and the request identifier are required. Everything else is
//! used for message formatting and defaults when absent.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Opaque identity of a single event delivery.
///
/// This is the dedup key: two deliveries carrying the same `RequestId` are
/// the same event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(CompactString);

impl RequestId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A parsed webhook notification.
///
/// The request identifier is read from `request_identifier`, falling back to
/// `request_id` when that key is missing or blank. Bodies may carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEvent")]
pub struct Event {
    /// Kind of notification, e.g. `domain.create`.
    #[serde(default)]
    pub name: String,
    /// Unique identity of this delivery.
    #[serde(rename = "request_identifier")]
    pub request_id: RequestId,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub actor: Option<Actor>,
    /// Event-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    request_identifier: Option<RequestId>,
    #[serde(default)]
    request_id: Option<RequestId>,
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    account: Option<Account>,
    #[serde(default)]
    actor: Option<Actor>,
    #[serde(default)]
    data: serde_json::Value,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let request_id = raw
            .request_identifier
            .filter(|id| !id.is_empty())
            .or(raw.request_id)
            .unwrap_or_default();
        Self {
            name: raw.name,
            request_id,
            api_version: raw.api_version,
            account: raw.account,
            actor: raw.actor,
            data: raw.data,
        }
    }
}

impl Event {
    /// Look up a string inside `data` by JSON pointer (e.g. `/domain/name`).
    pub fn data_str(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(serde_json::Value::as_str)
    }

    /// Look up a value inside `data` and render it as text.
    ///
    /// Numbers and booleans are rendered with their JSON representation.
    pub fn data_text(&self, pointer: &str) -> Option<String> {
        match self.data.pointer(pointer)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// The DNSimple account the event belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Who triggered the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub pretty: Option<String>,
}
