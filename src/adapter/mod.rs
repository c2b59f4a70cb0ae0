//! Boundary to the photo-listing backend.
//!
//! A [`ContainerAdapter`] answers two questions about a container:
//! - which photos it holds, one page at a time (`fetch_page`)
//! - what it looks like overall (`fetch_container_meta`)
//!
//! Pages come back in window order regardless of which edge asked for
//! them, so the window can splice a page without re-sorting. A page
//! shorter than the requested count means the queried edge is
//! exhausted; it is not an error.

pub mod fixture;

pub use fixture::FixtureAdapter;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{ContainerMeta, ContainerRef, Photo, PhotoId, SortOrder};

/// Where a page starts, relative to the container's window-order sequence.
///
/// Continuation anchors are keyset cursors on `(taken_at, id)`: capture
/// timestamps are not unique, so the id tiebreak keeps pages gap-free
/// and duplicate-free across page boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAnchor {
    /// Skip this many photos from the container start, in window order.
    Offset(usize),
    /// Start at the first photo at or past this date in window order.
    /// This is how a date jump lands.
    FromDate(DateTime<Utc>),
    /// Photos strictly past this key in window order (tail continuation).
    After {
        taken_at: DateTime<Utc>,
        id: PhotoId,
    },
    /// Photos strictly before this key in window order (head
    /// continuation). `id: None` anchors on the timestamp alone, for
    /// the case where no loaded photo exists to anchor on.
    Before {
        taken_at: DateTime<Utc>,
        id: Option<PhotoId>,
    },
}

/// One page fetch, fully described.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub container: ContainerRef,
    pub anchor: PageAnchor,
    /// Maximum photos to return.
    pub count: usize,
    pub order: SortOrder,
}

/// Listing backend for one kind of photo container.
///
/// Implementations must return pages in window order. For
/// [`PageAnchor::Before`] the page is the `count` photos immediately
/// preceding the anchor, still in window order, so the photo adjacent
/// to the anchor comes last.
#[async_trait]
pub trait ContainerAdapter: Send + Sync {
    /// Fetch one page of photo summaries.
    async fn fetch_page(&self, req: &PageRequest) -> Result<Vec<Photo>>;

    /// Fetch container-level metadata: total count, date span, jump
    /// shortcuts.
    async fn fetch_container_meta(&self, container: ContainerRef) -> Result<ContainerMeta>;
}
