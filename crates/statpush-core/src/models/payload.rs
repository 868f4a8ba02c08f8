//! Platform wire envelope.
//!
//! The exact JSON body accepted by the plugin metrics API. Values are always
//! emitted as JSON numbers; the API rejects string-typed numerics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent version reported in every request
pub const AGENT_VERSION: &str = "1.0.0";

/// POST body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPayload {
    pub agent: AgentInfo,
    pub components: Vec<ComponentPayload>,
}

/// Reporting agent identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// FQDN of the reporting machine
    pub host: String,
    pub version: String,
    /// Omitted entirely when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

/// One entry of the `components` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPayload {
    pub name: String,
    pub guid: String,
    pub duration: u64,
    pub metrics: MetricValues,
}

/// `metrics` is a key → value object for a simple metric and a bare
/// number for agent metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValues {
    Keyed(BTreeMap<String, i64>),
    Single(i64),
}
