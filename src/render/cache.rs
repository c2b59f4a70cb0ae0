use std::collections::HashMap;
use std::time::Instant;

use parking_lot::RwLock;
use xxhash_rust::xxh3::xxh3_64;

use crate::grouping::GroupingStrategy;
use crate::models::Photo;
use crate::render::items::RenderItem;

/// Maximum number of cached render sequences to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Everything that changes the shape of the rendered sequence.
///
/// The hash stands in for the photo list itself; the rest are the
/// build parameters, so toggling a loading placeholder or resizing to
/// a different column count is a different entry rather than an
/// invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub list_hash: u64,
    pub strategy: GroupingStrategy,
    pub columns: u32,
    pub loading_before: bool,
    pub loading_after: bool,
}

struct CachedSequence {
    items: Vec<RenderItem>,
    last_used: Instant,
}

/// Cache of built render sequences keyed by [`RenderKey`].
///
/// Grouping and chunking are linear passes that clone every photo;
/// a scroll tick that changed nothing shouldn't pay that again. Small
/// and last-used-evicted, like a handful of recent window states.
pub struct RenderCache {
    cache: RwLock<HashMap<RenderKey, CachedSequence>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(MAX_CACHE_ENTRIES)),
        }
    }

    /// Fast hash of the window's photo list. Identity and capture
    /// time pin both membership and order, so any merge, removal, or
    /// reset changes the hash.
    pub fn compute_list_hash(photos: &[Photo]) -> u64 {
        let mut input = Vec::with_capacity(photos.len() * 16);
        for photo in photos {
            input.extend_from_slice(&photo.id.to_le_bytes());
            input.extend_from_slice(&photo.taken_at.timestamp_micros().to_le_bytes());
        }
        xxh3_64(&input)
    }

    /// Retrieve a cached sequence, refreshing its eviction clock.
    pub fn get(&self, key: RenderKey) -> Option<Vec<RenderItem>> {
        let mut cache = self.cache.write();
        let entry = cache.get_mut(&key)?;
        entry.last_used = Instant::now();
        Some(entry.items.clone())
    }

    pub fn set(&self, key: RenderKey, items: Vec<RenderItem>) {
        let mut cache = self.cache.write();
        if cache.len() >= MAX_CACHE_ENTRIES && !cache.contains_key(&key) {
            evict_oldest(&mut cache);
        }
        cache.insert(
            key,
            CachedSequence {
                items,
                last_used: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

fn evict_oldest(cache: &mut HashMap<RenderKey, CachedSequence>) {
    let oldest_key = cache
        .iter()
        .min_by_key(|(_, v)| v.last_used)
        .map(|(k, _)| *k);
    if let Some(key) = oldest_key {
        cache.remove(&key);
    }
}
