//! Event envelope parsing.

use crate::objects::event::Event;

/// Errors produced while turning a raw request body into an [`Event`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid event payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Parse a raw webhook body.
///
/// The body must be a JSON object carrying a non-empty `name` and a
/// non-empty request identifier (`request_identifier` or `request_id`).
pub fn parse_event(body: &[u8]) -> Result<Event, ParseError> {
    let event: Event = serde_json::from_slice(body)?;

    if event.name.trim().is_empty() {
        return Err(ParseError::MissingField("name"));
    }
    if event.request_id.is_empty() {
        return Err(ParseError::MissingField("request_identifier"));
    }

    Ok(event)
}
