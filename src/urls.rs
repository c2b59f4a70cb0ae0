//! Media URL derivation with memoization.
//!
//! Every rendered card derives thumbnail URLs on every pass, so the
//! resolver memoizes built strings in an LRU keyed by a hash of
//! (public id, rendition). Read-only and side-effect-free: safe to
//! share across everything that renders photos.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::Photo;

/// Number of memoized URLs to keep (entries, not bytes).
const URL_CACHE_CAPACITY: usize = 4096;

/// Thumbnail sizes the media endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbSize {
    Small,
    Medium,
    Large,
}

impl ThumbSize {
    fn segment(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Addressable renditions of one photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rendition {
    Thumb(ThumbSize),
    Photo,
    Video,
}

const ALL_RENDITIONS: [Rendition; 5] = [
    Rendition::Thumb(ThumbSize::Small),
    Rendition::Thumb(ThumbSize::Medium),
    Rendition::Thumb(ThumbSize::Large),
    Rendition::Photo,
    Rendition::Video,
];

impl Rendition {
    fn tag(self) -> u8 {
        match self {
            Self::Thumb(ThumbSize::Small) => 0,
            Self::Thumb(ThumbSize::Medium) => 1,
            Self::Thumb(ThumbSize::Large) => 2,
            Self::Photo => 3,
            Self::Video => 4,
        }
    }
}

fn cache_key(public_id: &str, rendition: Rendition) -> u64 {
    let mut data = Vec::with_capacity(public_id.len() + 1);
    data.push(rendition.tag());
    data.extend_from_slice(public_id.as_bytes());
    xxh3_64(&data)
}

/// Builds and memoizes media URLs for one backend base URL.
pub struct UrlResolver {
    base: String,
    cache: RwLock<LruCache<u64, Arc<str>>>,
}

impl UrlResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            cache: RwLock::new(LruCache::new(
                NonZeroUsize::new(URL_CACHE_CAPACITY).unwrap(),
            )),
        }
    }

    /// Thumbnail URL at the given size.
    pub fn thumb_url(&self, photo: &Photo, size: ThumbSize) -> Arc<str> {
        self.resolve(&photo.public_id, Rendition::Thumb(size))
    }

    /// Full-size display URL: the photo rendition, or the playable
    /// stream for videos.
    pub fn display_url(&self, photo: &Photo) -> Arc<str> {
        let rendition = if photo.is_video {
            Rendition::Video
        } else {
            Rendition::Photo
        };
        self.resolve(&photo.public_id, rendition)
    }

    /// Drop every memoized rendition of one photo, e.g. after a
    /// server-side edit changed what its public id serves.
    pub fn invalidate(&self, public_id: &str) {
        let mut cache = self.cache.write();
        for rendition in ALL_RENDITIONS {
            cache.pop(&cache_key(public_id, rendition));
        }
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    fn resolve(&self, public_id: &str, rendition: Rendition) -> Arc<str> {
        let key = cache_key(public_id, rendition);
        if let Some(url) = self.cache.write().get(&key) {
            return Arc::clone(url);
        }
        let url: Arc<str> = self.build(public_id, rendition).into();
        self.cache.write().put(key, Arc::clone(&url));
        url
    }

    fn build(&self, public_id: &str, rendition: Rendition) -> String {
        match rendition {
            Rendition::Thumb(size) => format!(
                "{}/media/thumbnails/{}/{}.webp",
                self.base,
                size.segment(),
                public_id
            ),
            Rendition::Photo => format!("{}/media/photos/{}.webp", self.base, public_id),
            Rendition::Video => format!("{}/media/video/{}.mp4", self.base, public_id),
        }
    }
}
