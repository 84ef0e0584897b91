#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod admission;
pub mod clock;
pub mod config;
pub mod dedup;
pub mod processors;
pub mod relay;
