//! End-to-end report flow tests.
//!
//! Statistics endpoint → MetricRequest → platform endpoint, both served by
//! mockito.

use mockito::Matcher;
use statpush_core::config::SourceConfig;
use statpush_core::error::CoreError;
use statpush_core::models::metric::MetricComponent;
use statpush_core::models::request::{ComponentIdentity, MetricRequest};
use statpush_core::ports::stats_source::StatsSource;
use statpush_network::platform_client::PlatformClient;
use statpush_network::site_stats_client::SiteStatsClient;
use std::time::Duration;

fn source_config(base_url: &str) -> SourceConfig {
    SourceConfig {
        base_url: base_url.to_string(),
        key: "site-key".to_string(),
        ..SourceConfig::default()
    }
}

#[tokio::test]
async fn statistics_are_forwarded_as_numbers() {
    let mut site = mockito::Server::new_async().await;
    let stats_mock = site
        .mock("GET", "/new-relic-rpm-plugin/site-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"total_users":1337,"total_nodes":"250","site_name":"Example"}"#)
        .create_async()
        .await;

    let mut platform = mockito::Server::new_async().await;
    let platform_mock = platform
        .mock("POST", "/platform/v1/metrics")
        .match_header("x-license-key", "license-abc")
        .match_body(Matcher::Json(serde_json::json!({
            "agent": { "host": "web01.example.com", "version": "1.0.0" },
            "components": [
                {
                    "name": "Example",
                    "guid": "org.Drupal",
                    "duration": 300,
                    "metrics": { "Component/total_users[users]": 1337 }
                },
                {
                    "name": "Example",
                    "guid": "org.Drupal",
                    "duration": 300,
                    "metrics": { "Component/total_nodes[nodes]": 250 }
                }
            ]
        })))
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let source = SiteStatsClient::new(&source_config(&site.url()), Duration::from_secs(5)).unwrap();
    let stats = source.fetch_stats().await.unwrap();

    let mut request = MetricRequest::new();
    request.url = format!("{}/platform/v1/metrics", platform.url());
    request.license_key = "license-abc".to_string();
    request.host = "web01.example.com".to_string();
    request.identity = Some(ComponentIdentity::new(
        stats.site_name().unwrap(),
        "org.Drupal",
        300,
    ));
    for (key, units) in [("total_users", "users"), ("total_nodes", "nodes")] {
        request.add_component(MetricComponent::simple(key, units, stats.count(key).unwrap()));
    }

    let sender = PlatformClient::new(Duration::from_secs(5), false).unwrap();
    let response = request.send(&sender).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"status":"ok"}"#);

    stats_mock.assert_async().await;
    platform_mock.assert_async().await;
}

#[tokio::test]
async fn precondition_failure_makes_no_request() {
    let mut platform = mockito::Server::new_async().await;
    let platform_mock = platform
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut request = MetricRequest::new();
    request.url = format!("{}/platform/v1/metrics", platform.url());
    request.license_key = "license-abc".to_string();
    request.identity = Some(ComponentIdentity::new("Example", "org.Drupal", 300));
    request.add_component(MetricComponent::simple("total_users", "users", 1));

    let sender = PlatformClient::new(Duration::from_secs(5), false).unwrap();
    let err = request.send(&sender).await.unwrap_err();

    assert!(matches!(err, CoreError::Precondition { .. }));
    assert!(request.response().is_none());
    platform_mock.assert_async().await;
}

#[tokio::test]
async fn rejected_request_still_stores_response() {
    let mut platform = mockito::Server::new_async().await;
    let platform_mock = platform
        .mock("POST", "/platform/v1/metrics")
        .with_status(400)
        .with_body(r#"{"error":"Invalid component"}"#)
        .create_async()
        .await;

    let mut request = MetricRequest::new();
    request.url = format!("{}/platform/v1/metrics", platform.url());
    request.license_key = "license-abc".to_string();
    request.host = "web01.example.com".to_string();
    request.pid = Some(31337);
    request.add_component(MetricComponent::agent("Cron runs", "org.example.cron", 60, 3));

    let sender = PlatformClient::new(Duration::from_secs(5), false).unwrap();
    request.send(&sender).await.unwrap();

    let response = request.response().unwrap();
    assert_eq!(response.status, 400);
    assert!(response.body.contains("Invalid component"));
    platform_mock.assert_async().await;
}

#[tokio::test]
async fn resend_overwrites_previous_response() {
    let mut platform = mockito::Server::new_async().await;
    let first = platform
        .mock("POST", "/platform/v1/metrics")
        .with_status(503)
        .with_body("busy")
        .expect(1)
        .create_async()
        .await;

    let mut request = MetricRequest::new();
    request.url = format!("{}/platform/v1/metrics", platform.url());
    request.license_key = "license-abc".to_string();
    request.host = "web01.example.com".to_string();

    let sender = PlatformClient::new(Duration::from_secs(5), false).unwrap();
    request.send(&sender).await.unwrap();
    assert_eq!(request.response().unwrap().status, 503);
    first.assert_async().await;
    first.remove_async().await;

    let second = platform
        .mock("POST", "/platform/v1/metrics")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    request.send(&sender).await.unwrap();
    assert_eq!(request.response().unwrap().status, 200);
    assert_eq!(request.response().unwrap().body, "ok");
    second.assert_async().await;
}
