//! # statpush
//!
//! Collector binary: fetches the site statistics document, forwards the
//! published measurements to the metrics platform and prints the raw
//! platform response to stdout. Logs go to stderr.

mod collector;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use statpush_core::config::AppConfig;
use statpush_core::config_manager::ConfigManager;
use statpush_network::platform_client::PlatformClient;
use statpush_network::site_stats_client::SiteStatsClient;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::collector::{CollectOutcome, CollectorSettings};

/// Forward site statistics to the metrics platform
///
/// `-h` is the agent host, so help is only available as `--help`.
#[derive(Parser, Debug)]
#[command(name = "statpush")]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Args {
    /// Site base URL
    #[arg(short = 'u', long = "url")]
    base_url: Option<String>,

    /// Site statistics key (also the license key unless configured)
    #[arg(short = 'k', long)]
    key: Option<String>,

    /// FQDN of this machine
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// Config file (default: platform config dir, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the platform endpoint
    #[arg(long)]
    platform_url: Option<String>,

    /// Report this process id in the agent block
    #[arg(long)]
    pid: bool,

    /// Disable TLS certificate verification (test environments only)
    #[arg(long)]
    insecure: bool,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    init_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn")]
    log_level: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// Apply CLI overrides on top of the loaded config
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(ref base_url) = args.base_url {
        config.source.base_url = base_url.clone();
    }
    if let Some(ref key) = args.key {
        config.source.key = key.clone();
    }
    if let Some(ref host) = args.host {
        config.agent.host = host.clone();
    }
    if let Some(ref url) = args.platform_url {
        config.platform.url = url.clone();
    }
    if args.pid {
        config.agent.report_pid = true;
    }
    if args.insecure {
        config.platform.accept_invalid_certs = true;
        config.source.accept_invalid_certs = true;
    }
}

fn init_tracing(log_level: &str) {
    let log_filter = format!(
        "statpush={log_level},statpush_core={log_level},statpush_network={log_level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let manager = ConfigManager::load(args.config.as_deref())?;
    if let Some(path) = manager.config_path() {
        info!("config: {}", path.display());
    }
    let mut config = manager.into_config();
    apply_overrides(&mut config, &args);

    if args.init_config {
        let path = args
            .config
            .clone()
            .or_else(|| ConfigManager::config_dir().map(|dir| dir.join("config.json")))
            .context("no config path available on this platform")?;
        ConfigManager::new(config).save_to(&path)?;
        eprintln!("config written: {}", path.display());
        return Ok(());
    }

    config.validate()?;
    if config.agent.host.is_empty() {
        warn!("agent host not set (-h); the request will be rejected");
    }

    let source = SiteStatsClient::new(&config.source, config.source_timeout())?;
    let sender = PlatformClient::from_config(&config)?;
    let settings = CollectorSettings::from_config(&config, std::process::id());

    let outcome = collector::run(&source, &sender, &config.measurements, &settings)
        .await
        .with_context(|| format!("failed to report statistics from {}", source.url()))?;

    match outcome {
        CollectOutcome::Skipped => {}
        CollectOutcome::Sent(response) => println!("{}", response.body),
    }

    Ok(())
}
