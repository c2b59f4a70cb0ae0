//! In-memory [`ContainerAdapter`] backed by a plain photo list.
//!
//! Used throughout the crate's tests and handy for prototyping a
//! client without a backend. Counts every call and can inject fetch
//! failures, so tests can assert how often and whether the window
//! talked to it.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::adapter::{ContainerAdapter, PageAnchor, PageRequest};
use crate::models::{ContainerMeta, ContainerRef, DateJump, Photo, PhotoId, SortOrder};

/// Deterministic adapter over an in-memory photo list.
///
/// Photos are kept sorted ascending by `(taken_at, id)`; the requested
/// order decides which direction a page walks. Metadata is derived
/// live from the list, so mutating the fixture between fetches models
/// a container changing server-side.
pub struct FixtureAdapter {
    photos: RwLock<Vec<Photo>>,
    date_jumps: RwLock<Vec<DateJump>>,
    fetch_calls: AtomicU64,
    meta_calls: AtomicU64,
    fail_remaining: AtomicU32,
}

impl FixtureAdapter {
    pub fn new(mut photos: Vec<Photo>) -> Self {
        photos.sort_by_key(Photo::sort_key);
        Self {
            photos: RwLock::new(photos),
            date_jumps: RwLock::new(Vec::new()),
            fetch_calls: AtomicU64::new(0),
            meta_calls: AtomicU64::new(0),
            fail_remaining: AtomicU32::new(0),
        }
    }

    /// Replace the advertised jump shortcuts.
    pub fn with_date_jumps(self, jumps: Vec<DateJump>) -> Self {
        *self.date_jumps.write() = jumps;
        self
    }

    /// Replace the photo list, e.g. to model server-side edits.
    pub fn set_photos(&self, mut photos: Vec<Photo>) {
        photos.sort_by_key(Photo::sort_key);
        *self.photos.write() = photos;
    }

    /// Make the next `n` calls to `fetch_page` fail.
    pub fn fail_next_fetches(&self, n: u32) {
        self.fail_remaining.store(n, Ordering::Relaxed);
    }

    /// How many page fetches have been issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    /// How many metadata fetches have been issued so far.
    pub fn meta_count(&self) -> u64 {
        self.meta_calls.load(Ordering::Relaxed)
    }

    fn take_injected_failure(&self) -> bool {
        self.fail_remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// True when `photo` sits strictly before the anchor key in window order.
fn strictly_before(
    photo: &Photo,
    taken_at: DateTime<Utc>,
    id: Option<PhotoId>,
    order: SortOrder,
) -> bool {
    match id {
        Some(id) => {
            let key = (taken_at, id);
            photo.sort_key() != key && order.in_order(photo.sort_key(), key)
        }
        // No id to break ties with: anchor on the timestamp alone.
        None => match order {
            SortOrder::DateAsc => photo.taken_at < taken_at,
            SortOrder::DateDesc => photo.taken_at > taken_at,
        },
    }
}

/// True when `photo` is at or past `date` in window order.
fn at_or_past(photo: &Photo, date: DateTime<Utc>, order: SortOrder) -> bool {
    match order {
        SortOrder::DateAsc => photo.taken_at >= date,
        SortOrder::DateDesc => photo.taken_at <= date,
    }
}

#[async_trait]
impl ContainerAdapter for FixtureAdapter {
    async fn fetch_page(&self, req: &PageRequest) -> Result<Vec<Photo>> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if self.take_injected_failure() {
            bail!("injected fetch failure");
        }

        let photos = self.photos.read();
        let ordered: Vec<&Photo> = match req.order {
            SortOrder::DateAsc => photos.iter().collect(),
            SortOrder::DateDesc => photos.iter().rev().collect(),
        };

        let page: Vec<Photo> = match req.anchor {
            PageAnchor::Offset(skip) => ordered
                .into_iter()
                .skip(skip)
                .take(req.count)
                .cloned()
                .collect(),
            PageAnchor::FromDate(date) => ordered
                .into_iter()
                .skip_while(|p| !at_or_past(p, date, req.order))
                .take(req.count)
                .cloned()
                .collect(),
            PageAnchor::After { taken_at, id } => {
                let key = (taken_at, id);
                ordered
                    .into_iter()
                    .skip_while(|p| req.order.in_order(p.sort_key(), key))
                    .take(req.count)
                    .cloned()
                    .collect()
            }
            PageAnchor::Before { taken_at, id } => {
                // The page is the `count` photos immediately preceding
                // the anchor, kept in window order.
                let before: Vec<&Photo> = ordered
                    .into_iter()
                    .filter(|p| strictly_before(p, taken_at, id, req.order))
                    .collect();
                let start = before.len().saturating_sub(req.count);
                before[start..].iter().map(|p| (*p).clone()).collect()
            }
        };
        Ok(page)
    }

    async fn fetch_container_meta(&self, _container: ContainerRef) -> Result<ContainerMeta> {
        self.meta_calls.fetch_add(1, Ordering::Relaxed);
        let photos = self.photos.read();
        Ok(ContainerMeta {
            total_count: photos.len(),
            min_date: photos.first().map(|p| p.taken_at),
            max_date: photos.last().map(|p| p.taken_at),
            date_jumps: self.date_jumps.read().clone(),
        })
    }
}
