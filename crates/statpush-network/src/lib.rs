//! # statpush-network
//!
//! HTTP adapters built on reqwest.
//!
//! - [`platform_client`]: `MetricSender` implementation, POSTs metric
//!   requests to the platform API
//! - [`site_stats_client`]: `StatsSource` implementation, GETs the
//!   statistics document from the monitored site
//!
//! ## Usage
//!
//! ```rust,ignore
//! use statpush_network::platform_client::PlatformClient;
//! use statpush_network::site_stats_client::SiteStatsClient;
//!
//! let sender = PlatformClient::new(Duration::from_secs(30), false)?;
//! let response = request.send(&sender).await?;
//! ```

pub mod platform_client;
pub mod site_stats_client;

use statpush_core::error::CoreError;
use std::time::Duration;

/// Build a reqwest client with the shared timeout/TLS policy
pub(crate) fn build_client(
    timeout: Duration,
    accept_invalid_certs: bool,
) -> Result<reqwest::Client, CoreError> {
    if accept_invalid_certs {
        tracing::warn!("TLS certificate verification disabled");
    }

    reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| CoreError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Map a reqwest failure to `CoreError::Transport`
pub(crate) fn transport_error(context: &str, error: reqwest::Error) -> CoreError {
    if error.is_timeout() {
        CoreError::Transport(format!("{context}: request timed out"))
    } else if error.is_connect() {
        CoreError::Transport(format!("{context}: connection failed: {error}"))
    } else {
        CoreError::Transport(format!("{context}: {error}"))
    }
}
