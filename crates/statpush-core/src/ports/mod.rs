//! Port interfaces (traits).
//!
//! Implemented by `statpush-network` and wired in `statpush-app`.
//! All async traits use `async_trait` for object safety.

pub mod metric_sender;
pub mod stats_source;
