use crate::timeline::Edge;

/// Errors surfaced by timeline operations.
///
/// Fetch failures are transient: the edge that failed keeps its
/// `has_more` flag so a later scroll retries naturally. Stale results
/// from a superseded fetch are dropped silently and never reach here.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// A jump target that could not be parsed. Rejected before any
    /// fetch is issued; window state is untouched.
    #[error("invalid jump target: {0:?}")]
    InvalidJumpTarget(String),

    /// The adapter failed while fetching a page at the given edge.
    #[error("fetch at {edge:?} edge failed")]
    Fetch {
        edge: Edge,
        #[source]
        source: anyhow::Error,
    },

    /// Container metadata could not be fetched while mounting a feed.
    #[error("container metadata fetch failed")]
    Meta(#[source] anyhow::Error),
}

impl TimelineError {
    pub fn fetch(edge: Edge, source: anyhow::Error) -> Self {
        Self::Fetch { edge, source }
    }
}
