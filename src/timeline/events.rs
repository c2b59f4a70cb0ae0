//! Change notifications emitted by a photo window.
//!
//! The window pushes an event for every mutation it makes and the view
//! layer drains them with `poll_events`, typically once per frame.

use crate::models::PhotoId;

/// One of the two directions a window can grow in.
///
/// `After` extends the window forward in the current sort direction;
/// `Before` extends it backward, which matters after a date jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    After,
    Before,
}

/// Notification of a window change.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The window was discarded and restarted (jump or refresh).
    /// Anything rendered from the old window is stale.
    Reset { generation: u64 },
    /// A page landed and was merged into the window.
    PageLoaded {
        edge: Edge,
        /// Photos actually added after dedup.
        merged: usize,
        /// Window size after the merge.
        total: usize,
    },
    /// An edge returned a short page; no more photos that way.
    EdgeExhausted { edge: Edge },
    /// A fetch failed. The edge stays retryable.
    LoadFailed { edge: Edge, error: String },
    /// A photo was dropped from the window.
    PhotoRemoved { id: PhotoId },
}
