//! Platform metrics client.
//!
//! `MetricSender` port implementation. One POST per call, no retry, no
//! interpretation of the response status.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use statpush_core::config::AppConfig;
use statpush_core::error::CoreError;
use statpush_core::models::response::PlatformResponse;
use statpush_core::ports::metric_sender::{MetricSender, MetricSubmission};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{build_client, transport_error};

/// License key header expected by the platform
pub const LICENSE_KEY_HEADER: &str = "X-License-Key";

/// Plugin metrics API client
pub struct PlatformClient {
    client: reqwest::Client,
}

impl PlatformClient {
    /// New client. `accept_invalid_certs` must stay false outside test setups.
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(timeout, accept_invalid_certs)?,
        })
    }

    /// Client using the `platform` section of the config
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Self::new(config.platform_timeout(), config.platform.accept_invalid_certs)
    }
}

#[async_trait]
impl MetricSender for PlatformClient {
    async fn post_metrics(
        &self,
        submission: &MetricSubmission,
    ) -> Result<PlatformResponse, CoreError> {
        debug!("POST {} ({} bytes)", submission.url, submission.body.len());

        let resp = self
            .client
            .post(&submission.url)
            .header(LICENSE_KEY_HEADER, &submission.license_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(submission.body.clone())
            .send()
            .await
            .map_err(|e| transport_error("metric upload failed", e))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| transport_error("failed to read platform response", e))?;

        let response = PlatformResponse::new(status, body);
        if !response.is_success() {
            warn!("platform answered {status}");
        }
        Ok(response)
    }
}
