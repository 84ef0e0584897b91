//! HTTP handlers.
//!
//! # Endpoints
//!
//! - `GET  /`                              – liveness probe
//! - `POST /relay/{alpha}/{beta}/{gamma}` – relay a webhook event
//! - `POST /slack/{alpha}/{beta}/{gamma}` – same as `/relay`, kept for existing senders

pub mod health;
pub mod relay;
