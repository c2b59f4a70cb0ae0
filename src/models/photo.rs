use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ContainerRef;

/// Identifier of a photo, unique within its container.
pub type PhotoId = i64;

/// Sort direction of a timeline, by capture timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "date-asc")]
    DateAsc,
    #[serde(rename = "date-desc")]
    DateDesc,
}

impl SortOrder {
    /// True when `a` sorts at or before `b` in this order
    /// (ties broken by id to keep keyset cursors total).
    pub fn in_order(self, a: (DateTime<Utc>, PhotoId), b: (DateTime<Utc>, PhotoId)) -> bool {
        match self {
            Self::DateAsc => a <= b,
            Self::DateDesc => a >= b,
        }
    }
}

/// Summary of a single photo as the listing API returns it.
///
/// Immutable once loaded: a server-side edit (date change, move, description)
/// invalidates the cached entry and forces a reload rather than patching it
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Numeric id, unique within the container.
    pub id: PhotoId,
    /// Opaque public identifier used to build thumbnail/image URLs.
    pub public_id: String,
    /// Capture timestamp; the timeline sort key. Not guaranteed unique.
    pub taken_at: DateTime<Utc>,
    /// The container this summary was listed from.
    pub container: ContainerRef,
    /// Whether this entry is a video (affects playback URL derivation).
    #[serde(default)]
    pub is_video: bool,
    /// Optional place name for group subtitles.
    #[serde(default)]
    pub place: Option<String>,
}

impl Photo {
    /// The (timestamp, id) pair keyset cursors anchor on.
    pub fn sort_key(&self) -> (DateTime<Utc>, PhotoId) {
        (self.taken_at, self.id)
    }
}
