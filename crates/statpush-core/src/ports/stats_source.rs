//! Site statistics source port.
//!
//! Implementation: `statpush-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::site_stats::SiteStats;

/// Fetches the statistics document published by the monitored site
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_stats(&self) -> Result<SiteStats, CoreError>;
}
