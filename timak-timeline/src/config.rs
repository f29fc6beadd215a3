//! Per-timeline configuration.

use serde::{Deserialize, Serialize};
use timak_types::Order;

use crate::error::{TimelineError, TimelineResult};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "timelines";

/// Window size used when none is configured.
pub const DEFAULT_MAX_ITEMS: usize = 1000;

/// Configuration for a [`Timeline`](crate::Timeline).
///
/// Missing fields take their defaults when deserialized, so the struct can
/// be embedded in a host application's config file:
///
/// ```
/// use timak_timeline::TimelineConfig;
/// use timak_types::Order;
///
/// let config: TimelineConfig =
///     serde_json::from_str(r#"{"namespace": "feeds", "order": "asc"}"#).unwrap();
/// assert_eq!(config.order, Order::Asc);
/// assert_eq!(config.max_items, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Store namespace (bucket) holding every key of this timeline.
    pub namespace: String,
    /// Ranking direction.
    pub order: Order,
    /// Entries kept per key, tombstones included.
    pub max_items: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            order: Order::Desc,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl TimelineConfig {
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Checks that the configuration can back a timeline.
    pub fn validate(&self) -> TimelineResult<()> {
        if self.namespace.is_empty() {
            return Err(TimelineError::InvalidConfig(
                "namespace must not be empty".to_string(),
            ));
        }
        if self.max_items == 0 {
            return Err(TimelineError::InvalidConfig(
                "max_items must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
