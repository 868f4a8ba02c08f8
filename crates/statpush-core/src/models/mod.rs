//! statpush domain models.
//!
//! Metric components, the request that carries them, the JSON envelope the
//! platform expects and the untyped statistics document read from the site.

pub mod metric;
pub mod payload;
pub mod request;
pub mod response;
pub mod site_stats;
