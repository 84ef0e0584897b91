//! Herald SDK
//!
//! Shared wire types for the Herald webhook relay: the inbound event
//! envelope, its parser, chat message formatting, and (behind the `client`
//! feature) the outbound Slack client.

pub mod format;
pub mod objects;
pub mod parse;

#[cfg(feature = "client")]
pub mod client;

pub use format::format_message;
pub use objects::event::{Account, Actor, Event, RequestId};
pub use parse::{ParseError, parse_event};
