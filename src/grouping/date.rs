use chrono::{DateTime, Datelike, Utc};

use crate::config::GroupingConfig;
use crate::models::{ContainerMeta, Photo};

/// How a window is partitioned for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupingStrategy {
    /// Flat grid, no date headers.
    None,
    /// One group per calendar day.
    Day,
    /// One group per calendar month.
    Month,
}

impl GroupingStrategy {
    /// The bucket granularity, if this strategy groups at all.
    pub fn bucket(self) -> Option<DateBucket> {
        match self {
            Self::None => None,
            Self::Day => Some(DateBucket::Day),
            Self::Month => Some(DateBucket::Month),
        }
    }
}

/// Granularity of a date bucket. Keys and titles derive from the
/// capture timestamp in UTC, so bucket boundaries don't drift with
/// the client's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateBucket {
    Day,
    Month,
}

impl DateBucket {
    /// Stable bucket key: `2024-03-05` for days, `2024-03` for months.
    pub fn key(self, taken_at: DateTime<Utc>) -> String {
        match self {
            Self::Day => taken_at.format("%Y-%m-%d").to_string(),
            Self::Month => format!("{:04}-{:02}", taken_at.year(), taken_at.month()),
        }
    }

    /// Header title: `Tuesday, 5 March 2024` for days, `March 2024`
    /// for months.
    pub fn title(self, taken_at: DateTime<Utc>) -> String {
        match self {
            Self::Day => taken_at.format("%A, %-d %B %Y").to_string(),
            Self::Month => taken_at.format("%B %Y").to_string(),
        }
    }
}

/// Pick the grouping for a container from its aggregate metadata.
///
/// Small containers render flat: a couple of rows gain nothing from
/// headers. Long-spanning containers group by month to bound header
/// density; everything else, including containers whose span is
/// unknown, groups by day.
pub fn determine_grouping_strategy(
    meta: &ContainerMeta,
    config: &GroupingConfig,
) -> GroupingStrategy {
    if meta.total_count <= config.flat_threshold {
        return GroupingStrategy::None;
    }
    match meta.span_days() {
        Some(days) if days > config.month_span_days => GroupingStrategy::Month,
        _ => GroupingStrategy::Day,
    }
}

/// A maximal run of photos sharing a bucket key, with its header text.
///
/// Derived, never stored: regenerated from the window on every change,
/// so the same photos always produce the same groups no matter how
/// they were paginated in.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup {
    /// The bucket key; stable across regroupings, used as a render key.
    pub key: String,
    pub title: String,
    /// Place names appearing in this bucket, trimmed, deduplicated,
    /// in first-seen order. Subtitle material.
    pub places: Vec<String>,
    pub photos: Vec<Photo>,
}

impl DateGroup {
    fn new(key: String, title: String) -> Self {
        Self {
            key,
            title,
            places: Vec::new(),
            photos: Vec::new(),
        }
    }

    fn push(&mut self, photo: Photo) {
        if let Some(place) = photo
            .place
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            if !self.places.iter().any(|existing| existing == place) {
                self.places.push(place.to_string());
            }
        }
        self.photos.push(photo);
    }
}

/// Bucket an ordered photo sequence into date groups.
///
/// A single pass over runs: photos keep their input order inside each
/// group and group order follows input order, so the result matches
/// the window's sort direction without a separate sort. Page
/// boundaries can't split a bucket because grouping always runs over
/// the whole merged window, never per fetched page.
pub fn group_photos_by_date(photos: &[Photo], bucket: DateBucket) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    for photo in photos {
        let key = bucket.key(photo.taken_at);
        match groups.last_mut() {
            Some(group) if group.key == key => group.push(photo.clone()),
            _ => {
                let mut group = DateGroup::new(key, bucket.title(photo.taken_at));
                group.push(photo.clone());
                groups.push(group);
            }
        }
    }
    groups
}
