use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of collection a timeline is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Directory,
    Gallery,
    Place,
}

/// Reference to a photo container: a directory, gallery, or place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerRef {
    pub kind: ContainerKind,
    pub id: i64,
}

impl ContainerRef {
    pub fn new(kind: ContainerKind, id: i64) -> Self {
        Self { kind, id }
    }
}

/// A quick-jump shortcut the container advertises ("2024", "March 2023", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateJump {
    /// Human-readable label to show in a jump menu.
    pub label: String,
    /// Date to jump the window to when selected.
    pub target: DateTime<Utc>,
}

/// Container-level metadata fetched once when a timeline mounts.
///
/// `total_count` and the date span drive grouping strategy selection;
/// `date_jumps` feeds the quick-navigation menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMeta {
    /// Total number of photos in the container, across all pages.
    pub total_count: usize,
    /// Earliest capture date in the container, if known.
    #[serde(default)]
    pub min_date: Option<DateTime<Utc>>,
    /// Latest capture date in the container, if known.
    #[serde(default)]
    pub max_date: Option<DateTime<Utc>>,
    /// Jump shortcuts, in the order the server wants them shown.
    #[serde(default)]
    pub date_jumps: Vec<DateJump>,
}

impl ContainerMeta {
    /// Span of the container in whole days, when both ends are known.
    /// An inverted pair (max before min) is bad aggregate data and
    /// counts as unknown.
    pub fn span_days(&self) -> Option<i64> {
        match (self.min_date, self.max_date) {
            (Some(min), Some(max)) if max >= min => Some((max - min).num_days()),
            _ => None,
        }
    }
}
