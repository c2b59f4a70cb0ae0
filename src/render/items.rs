use crate::grouping::{group_photos_by_date, split_photos_into_rows, GroupingStrategy};
use crate::models::Photo;

/// Render key of the placeholder shown while the before edge loads.
const LOADING_BEFORE_KEY: &str = "loading-before";

/// Render key of the placeholder shown while the after edge loads.
const LOADING_AFTER_KEY: &str = "loading-after";

/// One entry in the flat sequence handed to a virtualized list.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    /// Date section header.
    Header {
        key: String,
        title: String,
        /// Joined place names of the section, when any are known.
        subtitle: Option<String>,
    },
    /// One grid row of photos, at most `columns` wide.
    Row { key: String, photos: Vec<Photo> },
    /// Spinner placeholder at a loading edge.
    Loading { key: &'static str },
}

impl RenderItem {
    /// Stable identity for list reconciliation. Headers reuse their
    /// bucket key; rows key on their leading photo.
    pub fn key(&self) -> &str {
        match self {
            Self::Header { key, .. } => key,
            Self::Row { key, .. } => key,
            Self::Loading { key } => key,
        }
    }
}

/// Flatten a photo window into the sequence a virtualized list renders.
///
/// Shape: optional leading spinner, then either plain rows (no
/// grouping) or header-then-rows per date group, then an optional
/// trailing spinner. Rows never span a header: each group is chunked
/// on its own.
pub fn build_render_items(
    photos: &[Photo],
    strategy: GroupingStrategy,
    columns: usize,
    loading_before: bool,
    loading_after: bool,
) -> Vec<RenderItem> {
    let mut items = Vec::new();
    if loading_before {
        items.push(RenderItem::Loading {
            key: LOADING_BEFORE_KEY,
        });
    }
    match strategy.bucket() {
        None => push_rows(&mut items, photos, columns),
        Some(bucket) => {
            for group in group_photos_by_date(photos, bucket) {
                let subtitle = (!group.places.is_empty()).then(|| group.places.join(", "));
                items.push(RenderItem::Header {
                    key: group.key,
                    title: group.title,
                    subtitle,
                });
                push_rows(&mut items, &group.photos, columns);
            }
        }
    }
    if loading_after {
        items.push(RenderItem::Loading {
            key: LOADING_AFTER_KEY,
        });
    }
    items
}

fn push_rows(items: &mut Vec<RenderItem>, photos: &[Photo], columns: usize) {
    for row in split_photos_into_rows(photos, columns) {
        // Rows from the splitter are never empty.
        let key = format!("row-{}", row[0].id);
        items.push(RenderItem::Row { key, photos: row });
    }
}
