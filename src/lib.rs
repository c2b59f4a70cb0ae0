//! Bidirectional paginated photo timeline.
//!
//! - Windowed pagination over a remote photo collection: a contiguous
//!   slice that grows at either edge and can jump to an arbitrary date
//! - Keyset continuation anchors so pages stay stable while the
//!   backend mutates underneath
//! - Date-run grouping with an adaptive flat/day/month strategy
//! - Flat render-item sequences (headers, rows, loading markers) with
//!   hashed memoization so unchanged windows cost nothing to re-render
//! - Memoized media URL derivation per backend base URL

pub mod adapter;
pub mod config;
pub mod error;
pub mod grouping;
pub mod models;
pub mod render;
pub mod timeline;
pub mod urls;

pub use adapter::{ContainerAdapter, FixtureAdapter, PageAnchor, PageRequest};
pub use config::{GroupingConfig, TimelineConfig};
pub use error::TimelineError;
pub use grouping::{
    determine_grouping_strategy, group_photos_by_date, split_photos_into_rows, DateBucket,
    DateGroup, GroupingStrategy,
};
pub use models::{
    ContainerKind, ContainerMeta, ContainerRef, DateJump, Photo, PhotoId, SortOrder,
};
pub use render::{build_render_items, RenderCache, RenderItem, TimelineFeed};
pub use timeline::{Edge, LoadOutcome, PhotoWindow, ScrollMemory, WindowEvent};
pub use urls::{ThumbSize, UrlResolver};
