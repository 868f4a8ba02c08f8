//! Site statistics client.
//!
//! `StatsSource` port implementation: GET `{base_url}/{path_prefix}/{key}`
//! and parse the body as an untyped statistics document.

use async_trait::async_trait;
use statpush_core::config::SourceConfig;
use statpush_core::error::CoreError;
use statpush_core::models::site_stats::SiteStats;
use statpush_core::ports::stats_source::StatsSource;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{build_client, transport_error};

/// Client for the statistics endpoint of the monitored site
pub struct SiteStatsClient {
    client: reqwest::Client,
    url: Url,
}

impl SiteStatsClient {
    /// New client for the given source settings
    pub fn new(source: &SourceConfig, timeout: Duration) -> Result<Self, CoreError> {
        let url = stats_url(&source.base_url, &source.path_prefix, &source.key)?;
        Ok(Self {
            client: build_client(timeout, source.accept_invalid_certs)?,
            url,
        })
    }

    /// Resolved statistics URL
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Join base URL, prefix segments and the key (percent-encoded as one segment)
fn stats_url(base_url: &str, path_prefix: &str, key: &str) -> Result<Url, CoreError> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| CoreError::Config(format!("invalid source URL '{base_url}': {e}")))?;

    url.path_segments_mut()
        .map_err(|_| CoreError::Config(format!("source URL cannot be a base: {base_url}")))?
        .pop_if_empty()
        .extend(path_prefix.split('/').filter(|s| !s.is_empty()))
        .push(key);

    Ok(url)
}

#[async_trait]
impl StatsSource for SiteStatsClient {
    async fn fetch_stats(&self) -> Result<SiteStats, CoreError> {
        debug!("GET {}", self.url);

        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| transport_error("statistics request failed", e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| transport_error("failed to read statistics response", e))?;

        if !status.is_success() {
            return Err(CoreError::Source(format!(
                "statistics endpoint answered {status}"
            )));
        }

        let stats = SiteStats::from_json(&body)?;
        debug!("statistics received: {} keys", stats.len());
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str) -> SourceConfig {
        SourceConfig {
            base_url: base_url.to_string(),
            key: "s3cr3t".to_string(),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn url_joins_prefix_and_key() {
        let url = stats_url("https://example.com", "new-relic-rpm-plugin", "abc").unwrap();
        assert_eq!(url.as_str(), "https://example.com/new-relic-rpm-plugin/abc");

        let url = stats_url("https://example.com/drupal/", "new-relic-rpm-plugin", "abc").unwrap();
        assert_eq!(url.as_str(), "https://example.com/drupal/new-relic-rpm-plugin/abc");
    }

    #[test]
    fn url_encodes_key() {
        let url = stats_url("https://example.com", "stats/v1", "a/b c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/stats/v1/a%2Fb%20c");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        assert!(matches!(
            stats_url("not a url", "p", "k"),
            Err(CoreError::Config(_))
        ));
    }

    #[tokio::test]
    async fn fetches_statistics_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/new-relic-rpm-plugin/s3cr3t")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total_users":1337,"total_comments":12,"site_name":"Example"}"#)
            .create_async()
            .await;

        let client = SiteStatsClient::new(&source(&server.url()), Duration::from_secs(5)).unwrap();
        let stats = client.fetch_stats().await.unwrap();

        assert_eq!(stats.count("total_users"), Some(1337));
        assert_eq!(stats.count("total_nodes"), None);
        assert_eq!(stats.site_name(), Some("Example"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_source_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/new-relic-rpm-plugin/s3cr3t")
            .with_status(403)
            .with_body("Access denied")
            .create_async()
            .await;

        let client = SiteStatsClient::new(&source(&server.url()), Duration::from_secs(5)).unwrap();
        let err = client.fetch_stats().await.unwrap_err();

        assert!(matches!(err, CoreError::Source(ref m) if m.contains("403")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_object_body_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/new-relic-rpm-plugin/s3cr3t")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = SiteStatsClient::new(&source(&server.url()), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.fetch_stats().await,
            Err(CoreError::Source(_))
        ));
    }
}
