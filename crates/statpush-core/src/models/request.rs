//! Metric request.
//!
//! Aggregates the reporting agent identity and the attached components,
//! validates them, builds the wire envelope and hands it to a
//! [`MetricSender`]. One request object maps to one HTTP exchange.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::models::metric::{MetricComponent, MAX_COMPONENT_NAME_LEN};
use crate::models::payload::{AgentInfo, ComponentPayload, MetricPayload, MetricValues, AGENT_VERSION};
use crate::models::response::PlatformResponse;
use crate::ports::metric_sender::{MetricSender, MetricSubmission};

/// Plugin metrics endpoint
pub const DEFAULT_PLATFORM_URL: &str = "http://platform-api.newrelic.com/platform/v1/metrics";

/// Name, GUID and duration shared by every simple component of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentIdentity {
    /// Display name, at most [`MAX_COMPONENT_NAME_LEN`] characters
    pub name: String,
    /// Reverse-domain identifier
    pub guid: String,
    /// Reporting period in seconds
    pub duration_secs: u64,
}

impl ComponentIdentity {
    pub fn new(name: impl Into<String>, guid: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
            duration_secs,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.guid.is_empty() && self.duration_secs != 0
    }
}

/// Request to the plugin metrics API
#[derive(Debug, Clone)]
pub struct MetricRequest {
    /// Target endpoint
    pub url: String,
    /// Account license key (`X-License-Key`)
    pub license_key: String,
    /// FQDN of the machine making the request, not the monitored site
    pub host: String,
    /// Optional agent process id; `None` and `Some(0)` are both omitted
    pub pid: Option<u32>,
    /// Required once any simple component is attached
    pub identity: Option<ComponentIdentity>,
    components: Vec<MetricComponent>,
    response: Option<PlatformResponse>,
}

impl Default for MetricRequest {
    fn default() -> Self {
        Self {
            url: DEFAULT_PLATFORM_URL.to_string(),
            license_key: String::new(),
            host: String::new(),
            pid: None,
            identity: None,
            components: Vec::new(),
            response: None,
        }
    }
}

impl MetricRequest {
    /// Empty request targeting [`DEFAULT_PLATFORM_URL`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component. Validation is deferred to send time.
    pub fn add_component(&mut self, component: MetricComponent) {
        self.components.push(component);
    }

    /// Replace all components, keeping the given order
    pub fn set_components(&mut self, components: Vec<MetricComponent>) {
        self.components = components;
    }

    pub fn components(&self) -> &[MetricComponent] {
        &self.components
    }

    /// Response of the last send, if any
    pub fn response(&self) -> Option<&PlatformResponse> {
        self.response.as_ref()
    }

    /// The agent can report once the host is known
    pub fn is_agent_ready(&self) -> bool {
        !self.host.is_empty()
    }

    /// Check that the request can be sent. No side effects.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.is_agent_ready() {
            return Err(CoreError::precondition(
                "agent",
                "agent not ready: host has not been set",
            ));
        }

        if self.url.is_empty() {
            return Err(CoreError::precondition("url", "target URL is empty"));
        }

        if self.license_key.is_empty() {
            return Err(CoreError::precondition("license_key", "license key is empty"));
        }

        let needs_identity = self.components.iter().any(MetricComponent::is_simple);
        match &self.identity {
            Some(identity) => {
                if !identity.is_complete() {
                    return Err(CoreError::precondition(
                        "component identity",
                        "name, guid and duration must all be set",
                    ));
                }
                if identity.name.chars().count() > MAX_COMPONENT_NAME_LEN {
                    return Err(CoreError::precondition(
                        "component identity",
                        format!("name exceeds {MAX_COMPONENT_NAME_LEN} characters"),
                    ));
                }
            }
            None if needs_identity => {
                return Err(CoreError::precondition(
                    "component identity",
                    "simple metrics require a component name, guid and duration",
                ));
            }
            None => {}
        }

        let mut seen_keys = BTreeSet::new();
        for (index, component) in self.components.iter().enumerate() {
            let subject = || {
                let label = match component.label() {
                    "" => "unnamed",
                    label => label,
                };
                format!("component #{} ({label})", index + 1)
            };

            if !component.is_complete() {
                return Err(CoreError::precondition(
                    subject(),
                    "required metric fields are missing",
                ));
            }
            if let MetricComponent::Agent(metric) = component {
                if metric.name.chars().count() > MAX_COMPONENT_NAME_LEN {
                    return Err(CoreError::precondition(
                        subject(),
                        format!("name exceeds {MAX_COMPONENT_NAME_LEN} characters"),
                    ));
                }
            }
            if let Some(key) = component.display_key() {
                if seen_keys.contains(&key) {
                    return Err(CoreError::precondition(
                        subject(),
                        format!("duplicate metric key {key}"),
                    ));
                }
                seen_keys.insert(key);
            }
        }

        Ok(())
    }

    /// Build the wire envelope.
    ///
    /// Every component becomes one entry, in insertion order. Simple
    /// components are reported under the request identity.
    pub fn to_payload(&self) -> Result<MetricPayload, CoreError> {
        self.validate()?;

        let components = self
            .components
            .iter()
            .map(|component| match component {
                MetricComponent::Simple(metric) => {
                    let mut entry = self.identity_entry();
                    if let Some(key) = component.display_key() {
                        entry.metrics = MetricValues::Keyed(BTreeMap::from([(key, metric.value)]));
                    }
                    entry
                }
                MetricComponent::Agent(metric) => ComponentPayload {
                    name: metric.name.clone(),
                    guid: metric.guid.clone(),
                    duration: metric.duration_secs,
                    metrics: MetricValues::Single(metric.value),
                },
            })
            .collect();

        Ok(MetricPayload {
            agent: AgentInfo {
                host: self.host.clone(),
                version: AGENT_VERSION.to_string(),
                pid: self.pid.filter(|pid| *pid != 0),
            },
            components,
        })
    }

    /// JSON body for the POST
    pub fn to_json(&self) -> Result<String, CoreError> {
        let payload = self.to_payload()?;
        Ok(serde_json::to_string(&payload)?)
    }

    /// Validate, serialize and POST the request once.
    ///
    /// The response is stored on the request (replacing any previous one)
    /// whatever its status. No retry.
    pub async fn send(
        &mut self,
        sender: &dyn MetricSender,
    ) -> Result<&PlatformResponse, CoreError> {
        let body = self.to_json()?;
        debug!(
            "metric request: url={}, {} components, {} bytes",
            self.url,
            self.components.len(),
            body.len()
        );

        let submission = MetricSubmission {
            url: self.url.clone(),
            license_key: self.license_key.clone(),
            body,
        };
        let response = sender.post_metrics(&submission).await?;
        info!(
            "metrics sent: status={}, received_at={}",
            response.status,
            response.received_at.to_rfc3339()
        );

        let stored = self.response.insert(response);
        Ok(&*stored)
    }

    fn identity_entry(&self) -> ComponentPayload {
        let identity = self.identity.clone().unwrap_or_else(|| ComponentIdentity::new("", "", 0));
        ComponentPayload {
            name: identity.name,
            guid: identity.guid,
            duration: identity.duration_secs,
            metrics: MetricValues::Keyed(BTreeMap::new()),
        }
    }
}
