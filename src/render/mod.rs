//! From window contents to a renderable flat sequence.
//!
//! - `items`: the render-item model and the pure builder
//! - `cache`: memoized sequences keyed by window state
//! - `feed`: the mounted-timeline surface a list view binds to

pub mod cache;
pub mod feed;
pub mod items;

pub use cache::{RenderCache, RenderKey};
pub use feed::TimelineFeed;
pub use items::{build_render_items, RenderItem};
