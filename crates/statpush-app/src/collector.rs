//! Collector: site statistics → metric request → platform.
//!
//! Reads each configured measurement from the statistics document, builds a
//! simple component for every measurement the site publishes and sends them
//! in one request. When the site publishes none of them there is nothing to
//! report and the run is skipped.

use statpush_core::config::AppConfig;
use statpush_core::error::CoreError;
use statpush_core::models::metric::{MetricComponent, MAX_COMPONENT_NAME_LEN};
use statpush_core::models::request::{ComponentIdentity, MetricRequest};
use statpush_core::models::response::PlatformResponse;
use statpush_core::models::site_stats::{Measurement, SiteStats};
use statpush_core::ports::metric_sender::MetricSender;
use statpush_core::ports::stats_source::StatsSource;
use tracing::{debug, info};

/// Everything the collector needs besides the measurement table
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub platform_url: String,
    pub license_key: String,
    pub host: String,
    pub pid: Option<u32>,
    pub guid: String,
    pub duration_secs: u64,
    /// Component name when the site does not publish one
    pub fallback_name: String,
}

impl CollectorSettings {
    /// Settings from the resolved config; `pid` is reported only when enabled
    pub fn from_config(config: &AppConfig, pid: u32) -> Self {
        Self {
            platform_url: config.platform.url.clone(),
            license_key: config.effective_license_key().to_string(),
            host: config.agent.host.clone(),
            pid: config.agent.report_pid.then_some(pid),
            guid: config.component.guid.clone(),
            duration_secs: config.component.duration_secs,
            fallback_name: config.component.fallback_name.clone(),
        }
    }
}

/// Result of one collector run
#[derive(Debug)]
pub enum CollectOutcome {
    /// The site published none of the measurements
    Skipped,
    /// Request sent; raw platform response
    Sent(PlatformResponse),
}

/// Build the request for the measurements present in `stats`.
///
/// Returns `None` when no measurement is present. Validation happens later,
/// at send time.
pub fn build_request(
    stats: &SiteStats,
    measurements: &[Measurement],
    settings: &CollectorSettings,
) -> Option<MetricRequest> {
    let mut request = MetricRequest::new();

    for measurement in measurements {
        let Some(value) = stats.count(&measurement.key) else {
            debug!("measurement disabled on site: {}", measurement.key);
            continue;
        };

        debug!("{} = {value} {}", measurement.label, measurement.units);
        let mut component = MetricComponent::simple(&measurement.key, &measurement.units, value);
        if let Some(category) = &measurement.category {
            component = component.with_category(category);
        }
        request.add_component(component);
    }

    if request.components().is_empty() {
        return None;
    }

    let name = stats.site_name().unwrap_or(&settings.fallback_name);
    request.identity = Some(ComponentIdentity::new(
        truncate_name(name),
        &settings.guid,
        settings.duration_secs,
    ));
    request.url = settings.platform_url.clone();
    request.license_key = settings.license_key.clone();
    request.host = settings.host.clone();
    request.pid = settings.pid;

    Some(request)
}

/// Fetch, build and send. A skipped run performs no platform request.
pub async fn run(
    source: &dyn StatsSource,
    sender: &dyn MetricSender,
    measurements: &[Measurement],
    settings: &CollectorSettings,
) -> Result<CollectOutcome, CoreError> {
    let stats = source.fetch_stats().await?;

    let Some(mut request) = build_request(&stats, measurements, settings) else {
        info!("no measurements available, nothing to send");
        return Ok(CollectOutcome::Skipped);
    };

    let response = request.send(sender).await?.clone();
    Ok(CollectOutcome::Sent(response))
}

fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_COMPONENT_NAME_LEN).collect()
}
