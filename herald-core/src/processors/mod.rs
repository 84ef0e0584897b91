//! Background processors.
//!
//! - `CacheSweeper`: periodically reclaims expired dedup entries

pub mod cache_sweeper;

pub use cache_sweeper::CacheSweeper;
