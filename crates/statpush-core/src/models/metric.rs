//! Metric component model.
//!
//! A component is one measurable quantity in a request: either a simple
//! named/unit-tagged value reported under the request identity, or a
//! self-describing agent metric carrying its own GUID and duration.

/// Maximum length of a component display name accepted by the platform
pub const MAX_COMPONENT_NAME_LEN: usize = 32;

/// Simple metric: reported under the request identity as `Component/...[units]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleMetric {
    /// Machine name (e.g. "total_users")
    pub name: String,
    /// Optional grouping label
    pub category: Option<String>,
    /// Unit label (e.g. "users", "users/hour")
    pub units: String,
    /// Measured value
    pub value: i64,
}

/// Agent metric: one platform component entry of its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMetric {
    /// Display name, at most [`MAX_COMPONENT_NAME_LEN`] characters
    pub name: String,
    /// Reverse-domain identifier (e.g. "org.Drupal")
    pub guid: String,
    /// Reporting period in seconds
    pub duration_secs: u64,
    /// Measured value
    pub value: i64,
}

/// A single measurement attached to a [`MetricRequest`](super::request::MetricRequest)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricComponent {
    Simple(SimpleMetric),
    Agent(AgentMetric),
}

impl MetricComponent {
    /// Simple metric without a category
    pub fn simple(name: impl Into<String>, units: impl Into<String>, value: i64) -> Self {
        Self::Simple(SimpleMetric {
            name: name.into(),
            category: None,
            units: units.into(),
            value,
        })
    }

    /// Agent metric
    pub fn agent(
        name: impl Into<String>,
        guid: impl Into<String>,
        duration_secs: u64,
        value: i64,
    ) -> Self {
        Self::Agent(AgentMetric {
            name: name.into(),
            guid: guid.into(),
            duration_secs,
            value,
        })
    }

    /// Set the category (no-op for agent metrics)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        if let Self::Simple(metric) = &mut self {
            metric.category = Some(category.into());
        }
        self
    }

    /// Whether every required field of the variant is populated.
    ///
    /// Simple: name and units non-empty.
    /// Agent: name and guid non-empty, duration and value non-zero.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Simple(m) => !m.name.is_empty() && !m.units.is_empty(),
            Self::Agent(m) => {
                !m.name.is_empty() && !m.guid.is_empty() && m.duration_secs != 0 && m.value != 0
            }
        }
    }

    /// `Component/{category/}{name}[{units}]` for simple metrics.
    pub fn display_key(&self) -> Option<String> {
        let Self::Simple(m) = self else {
            return None;
        };

        let category = match m.category.as_deref() {
            Some(c) if !c.is_empty() => format!("{c}/"),
            _ => String::new(),
        };
        Some(format!("Component/{category}{}[{}]", m.name, m.units))
    }

    /// Component name, for diagnostics
    pub fn label(&self) -> &str {
        match self {
            Self::Simple(m) => &m.name,
            Self::Agent(m) => &m.name,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            Self::Simple(m) => m.value,
            Self::Agent(m) => m.value,
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_key_without_category() {
        let component = MetricComponent::simple("total_users", "users", 1337);
        assert_eq!(
            component.display_key().as_deref(),
            Some("Component/total_users[users]")
        );
    }

    #[test]
    fn display_key_with_category() {
        let component = MetricComponent::simple("signups", "users/hour", 5).with_category("Users");
        assert_eq!(
            component.display_key().as_deref(),
            Some("Component/Users/signups[users/hour]")
        );
    }

    #[test]
    fn display_key_ignores_empty_category() {
        let component = MetricComponent::simple("total_users", "users", 1).with_category("");
        assert_eq!(
            component.display_key().as_deref(),
            Some("Component/total_users[users]")
        );
    }

    #[test]
    fn display_key_tracks_field_changes() {
        let mut component = MetricComponent::simple("total_users", "users", 1);
        if let MetricComponent::Simple(m) = &mut component {
            m.units = "accounts".to_string();
        }
        assert_eq!(
            component.display_key().as_deref(),
            Some("Component/total_users[accounts]")
        );
    }

    #[test]
    fn agent_metric_has_no_display_key() {
        let component = MetricComponent::agent("Site", "org.Drupal", 300, 10);
        assert!(component.display_key().is_none());
    }

    #[test]
    fn simple_completeness() {
        assert!(MetricComponent::simple("total_users", "users", 0).is_complete());
        assert!(MetricComponent::simple("total_users", "users", 1337).is_complete());
        assert!(!MetricComponent::simple("", "users", 1337).is_complete());
        assert!(!MetricComponent::simple("total_users", "", 1337).is_complete());
    }

    #[test]
    fn agent_completeness() {
        assert!(MetricComponent::agent("Site", "org.Drupal", 300, 10).is_complete());
        assert!(!MetricComponent::agent("", "org.Drupal", 300, 10).is_complete());
        assert!(!MetricComponent::agent("Site", "", 300, 10).is_complete());
        assert!(!MetricComponent::agent("Site", "org.Drupal", 0, 10).is_complete());
        assert!(!MetricComponent::agent("Site", "org.Drupal", 300, 0).is_complete());
    }

    #[test]
    fn with_category_leaves_agent_untouched() {
        let component = MetricComponent::agent("Site", "org.Drupal", 300, 10).with_category("X");
        assert_eq!(component, MetricComponent::agent("Site", "org.Drupal", 300, 10));
        assert_eq!(component.label(), "Site");
        assert_eq!(component.value(), 10);
        assert!(!component.is_simple());
    }
}
