pub mod event;
pub mod slack;
