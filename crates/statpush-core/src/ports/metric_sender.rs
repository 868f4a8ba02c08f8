//! Metric sender port.
//!
//! Implementation: `statpush-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::response::PlatformResponse;

/// A serialized request ready to be POSTed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSubmission {
    /// Target endpoint
    pub url: String,
    /// Sent as the `X-License-Key` header
    pub license_key: String,
    /// JSON body
    pub body: String,
}

/// Performs the HTTP exchange with the metrics platform
#[async_trait]
pub trait MetricSender: Send + Sync {
    /// POST the submission once and return the raw response.
    ///
    /// Non-2xx responses are returned as `Ok`; only a failed exchange is an
    /// error (`CoreError::Transport`).
    async fn post_metrics(
        &self,
        submission: &MetricSubmission,
    ) -> Result<PlatformResponse, CoreError>;
}
