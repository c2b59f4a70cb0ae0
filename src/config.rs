//! Timeline tuning knobs.
//!
//! Everything here has a sensible default; construct with
//! `TimelineConfig::default()` and override what you need.

use serde::{Deserialize, Serialize};

/// Default photos per fetched page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Window sizes at or below this render flat, without date headers.
pub const DEFAULT_FLAT_THRESHOLD: usize = 20;

/// Containers spanning more than this many days group by month.
pub const DEFAULT_MONTH_SPAN_DAYS: i64 = 90;

/// Grouping strategy selection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupingConfig {
    /// Containers with at most this many photos skip grouping entirely.
    pub flat_threshold: usize,
    /// Date spans strictly greater than this (in days) group by month;
    /// shorter known spans group by day.
    pub month_span_days: i64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            flat_threshold: DEFAULT_FLAT_THRESHOLD,
            month_span_days: DEFAULT_MONTH_SPAN_DAYS,
        }
    }
}

/// Configuration for a photo timeline window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Photos requested per page. Clamped to at least 1.
    pub page_size: usize,
    /// Grouping thresholds.
    pub grouping: GroupingConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            grouping: GroupingConfig::default(),
        }
    }
}

impl TimelineConfig {
    /// Page size with the lower bound applied.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
