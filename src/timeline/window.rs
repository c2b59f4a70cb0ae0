//! Bidirectional paginated photo window.
//!
//! - Holds one contiguous, ordered slice of a container's timeline
//! - Grows at either edge via `load_more` / `load_more_before`
//! - Jumps discard the window and restart it at an arbitrary date
//! - Per-edge loading flags drop re-entrant calls while a fetch is
//!   in flight, so rapid scroll signals cost one request, not many
//! - A generation counter detects fetches that resolve after a jump
//!   has replaced the window; their results are dropped silently

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use flume::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::adapter::{ContainerAdapter, PageAnchor, PageRequest};
use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::models::{ContainerRef, Photo, PhotoId, SortOrder};
use crate::timeline::events::{Edge, WindowEvent};

/// How a load call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged; `merged` photos were new.
    Fetched { merged: usize },
    /// A fetch already holds this edge; the call was dropped.
    AlreadyLoading,
    /// The edge is exhausted, or there was nothing to anchor a fetch
    /// on. No request was issued.
    NoMore,
    /// The page resolved against a superseded window and was dropped.
    Stale,
}

/// Everything behind the window's lock.
///
/// The lock is never held across an await; fetches run between a
/// claim section and a resolve section, each short and synchronous.
struct WindowState {
    photos: Vec<Photo>,
    /// Ids currently in `photos`, for dedup on merge.
    ids: HashSet<PhotoId>,
    loading_after: bool,
    loading_before: bool,
    has_more_after: bool,
    has_more_before: bool,
    /// Date the window was last anchored at by a jump. Empty-window
    /// fetches fall back to it, so a jump that landed on nothing can
    /// still grow backward.
    origin: Option<DateTime<Utc>>,
    /// Bumped on every reset. Fetches capture it when they claim an
    /// edge and drop their result if it moved while they were away.
    generation: u64,
    last_scroll_offset: f64,
    pending_scroll_restoration: bool,
}

impl WindowState {
    fn new() -> Self {
        Self {
            photos: Vec::new(),
            ids: HashSet::new(),
            loading_after: false,
            loading_before: false,
            has_more_after: true,
            has_more_before: true,
            origin: None,
            generation: 0,
            last_scroll_offset: 0.0,
            pending_scroll_restoration: false,
        }
    }

    fn loading(&self, edge: Edge) -> bool {
        match edge {
            Edge::After => self.loading_after,
            Edge::Before => self.loading_before,
        }
    }

    fn set_loading(&mut self, edge: Edge, value: bool) {
        match edge {
            Edge::After => self.loading_after = value,
            Edge::Before => self.loading_before = value,
        }
    }

    fn has_more(&self, edge: Edge) -> bool {
        match edge {
            Edge::After => self.has_more_after,
            Edge::Before => self.has_more_before,
        }
    }

    fn set_has_more(&mut self, edge: Edge, value: bool) {
        match edge {
            Edge::After => self.has_more_after = value,
            Edge::Before => self.has_more_before = value,
        }
    }

    /// Where the next fetch at `edge` starts. `None` means there is
    /// nothing to anchor on (empty window, no origin) and no fetch
    /// should be issued.
    fn anchor(&self, edge: Edge) -> Option<PageAnchor> {
        match edge {
            Edge::After => Some(match (self.photos.last(), self.origin) {
                (Some(last), _) => PageAnchor::After {
                    taken_at: last.taken_at,
                    id: last.id,
                },
                (None, Some(origin)) => PageAnchor::FromDate(origin),
                (None, None) => PageAnchor::Offset(0),
            }),
            Edge::Before => match (self.photos.first(), self.origin) {
                (Some(first), _) => Some(PageAnchor::Before {
                    taken_at: first.taken_at,
                    id: Some(first.id),
                }),
                (None, Some(origin)) => Some(PageAnchor::Before {
                    taken_at: origin,
                    id: None,
                }),
                (None, None) => None,
            },
        }
    }

    /// Merge a page at an edge, skipping photos already present.
    /// Pages arrive in window order, so a prepend splices at the head
    /// as-is. Returns how many photos were new.
    fn merge(&mut self, edge: Edge, page: Vec<Photo>) -> usize {
        let fresh: Vec<Photo> = page
            .into_iter()
            .filter(|p| self.ids.insert(p.id))
            .collect();
        let merged = fresh.len();
        match edge {
            Edge::After => self.photos.extend(fresh),
            Edge::Before => {
                self.photos.splice(0..0, fresh);
            }
        }
        merged
    }

    /// Start a fresh window anchored at `origin`. Bumps the generation
    /// so in-flight fetches from the old window drop their results.
    fn reset(&mut self, origin: Option<DateTime<Utc>>) -> u64 {
        self.generation += 1;
        self.photos.clear();
        self.ids.clear();
        self.loading_after = false;
        self.loading_before = false;
        self.has_more_after = true;
        self.has_more_before = true;
        self.origin = origin;
        self.generation
    }
}

/// Clears an edge's loading flag on every exit path, including a
/// caller that stops polling mid-fetch. Without this a dropped fetch
/// would leave the flag stuck true and permanently stop pagination at
/// that edge.
struct EdgeGuard<'a> {
    state: &'a Mutex<WindowState>,
    edge: Edge,
    generation: u64,
    armed: bool,
}

impl EdgeGuard<'_> {
    /// Clear the flag under an already-held lock and disarm. Refuses
    /// to touch a window from a newer generation: after a jump the
    /// flag belongs to whoever claimed it since.
    fn release(mut self, st: &mut WindowState) {
        if st.generation == self.generation {
            st.set_loading(self.edge, false);
        }
        self.armed = false;
    }
}

impl Drop for EdgeGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut st = self.state.lock();
        if st.generation == self.generation {
            st.set_loading(self.edge, false);
        }
    }
}

/// The core pagination engine: one per viewed container.
///
/// All methods take `&self`; state lives behind a mutex that is only
/// held for short synchronous sections, never across a fetch. The
/// window is typically owned by a single view, but nothing here
/// breaks under shared use.
pub struct PhotoWindow {
    adapter: Arc<dyn ContainerAdapter>,
    container: ContainerRef,
    order: SortOrder,
    config: TimelineConfig,
    state: Mutex<WindowState>,
    event_tx: Sender<WindowEvent>,
    event_rx: Receiver<WindowEvent>,
}

impl PhotoWindow {
    pub fn new(adapter: Arc<dyn ContainerAdapter>, container: ContainerRef, order: SortOrder) -> Self {
        Self::with_config(adapter, container, order, TimelineConfig::default())
    }

    pub fn with_config(
        adapter: Arc<dyn ContainerAdapter>,
        container: ContainerRef,
        order: SortOrder,
        config: TimelineConfig,
    ) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        debug!(?container, ?order, "created photo window");
        Self {
            adapter,
            container,
            order,
            config,
            state: Mutex::new(WindowState::new()),
            event_tx,
            event_rx,
        }
    }

    pub fn container(&self) -> ContainerRef {
        self.container
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Fetch the next page at the after edge and append it.
    ///
    /// A no-op while a fetch already holds the edge or once the edge
    /// is exhausted; this is the backpressure that keeps rapid scroll
    /// signals from issuing duplicate requests.
    pub async fn load_more(&self) -> Result<LoadOutcome, TimelineError> {
        self.load_at(Edge::After).await
    }

    /// Fetch the page preceding the window head and prepend it.
    /// Same backpressure and short-page semantics as [`Self::load_more`].
    pub async fn load_more_before(&self) -> Result<LoadOutcome, TimelineError> {
        self.load_at(Edge::Before).await
    }

    async fn load_at(&self, edge: Edge) -> Result<LoadOutcome, TimelineError> {
        let count = self.config.effective_page_size();
        let (request, guard) = {
            let mut st = self.state.lock();
            if st.loading(edge) {
                trace!(?edge, "load dropped, fetch already in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            if !st.has_more(edge) {
                return Ok(LoadOutcome::NoMore);
            }
            let Some(anchor) = st.anchor(edge) else {
                return Ok(LoadOutcome::NoMore);
            };
            st.set_loading(edge, true);
            let guard = EdgeGuard {
                state: &self.state,
                edge,
                generation: st.generation,
                armed: true,
            };
            let request = PageRequest {
                container: self.container,
                anchor,
                count,
                order: self.order,
            };
            (request, guard)
        };

        trace!(?edge, anchor = ?request.anchor, count, "fetching page");
        let fetched = self.adapter.fetch_page(&request).await;

        let mut st = self.state.lock();
        let stale = st.generation != guard.generation;
        guard.release(&mut st);
        if stale {
            debug!(?edge, "dropped page fetched for a superseded window");
            return Ok(LoadOutcome::Stale);
        }

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!(?edge, error = ?e, "page fetch failed");
                let _ = self.event_tx.send(WindowEvent::LoadFailed {
                    edge,
                    error: e.to_string(),
                });
                return Err(TimelineError::fetch(edge, e));
            }
        };

        let fetched_count = page.len();
        let merged = st.merge(edge, page);
        if fetched_count < count {
            st.set_has_more(edge, false);
            let _ = self.event_tx.send(WindowEvent::EdgeExhausted { edge });
        }
        debug!(?edge, fetched = fetched_count, merged, total = st.photos.len(), "page merged");
        let _ = self.event_tx.send(WindowEvent::PageLoaded {
            edge,
            merged,
            total: st.photos.len(),
        });
        Ok(LoadOutcome::Fetched { merged })
    }

    /// Discard the window and restart it at `target`.
    ///
    /// Both edges become loadable again, scroll position moves to the
    /// top and the restoration flag is raised so the view snaps there
    /// once the new photos render. The initial page is fetched from
    /// `target` inclusive; earlier photos stay reachable through
    /// [`Self::load_more_before`].
    pub async fn jump_to_date(&self, target: DateTime<Utc>) -> Result<LoadOutcome, TimelineError> {
        {
            let mut st = self.state.lock();
            let generation = st.reset(Some(target));
            st.last_scroll_offset = 0.0;
            st.pending_scroll_restoration = true;
            debug!(target = %target, generation, "window jumped");
            let _ = self.event_tx.send(WindowEvent::Reset { generation });
        }
        self.load_more().await
    }

    /// [`Self::jump_to_date`] for targets that arrive as text, e.g.
    /// from a deep link. Accepts RFC 3339 or a bare `YYYY-MM-DD`.
    /// Rejected before any fetch is issued; the window is untouched
    /// on error.
    pub async fn jump_to_date_str(&self, target: &str) -> Result<LoadOutcome, TimelineError> {
        let parsed = parse_jump_target(target, self.order)
            .ok_or_else(|| TimelineError::InvalidJumpTarget(target.to_string()))?;
        self.jump_to_date(parsed).await
    }

    /// Discard and reload the window in place, keeping scroll
    /// position. The new window is anchored at the current head, so
    /// the user stays where they were while server-side edits (moves,
    /// deletions, date changes) are picked up.
    pub async fn refresh(&self) -> Result<LoadOutcome, TimelineError> {
        {
            let mut st = self.state.lock();
            let head = st.photos.first().map(|p| p.taken_at);
            let origin = head.or(st.origin);
            let generation = st.reset(origin);
            debug!(generation, "window refreshed");
            let _ = self.event_tx.send(WindowEvent::Reset { generation });
        }
        self.load_more().await
    }

    /// Drop one photo from the window, e.g. after a delete. Edges and
    /// flags are untouched; the window stays contiguous because the
    /// photo no longer exists in the container's timeline either.
    pub fn remove_photo(&self, id: PhotoId) -> bool {
        let mut st = self.state.lock();
        if !st.ids.remove(&id) {
            return false;
        }
        st.photos.retain(|p| p.id != id);
        let _ = self.event_tx.send(WindowEvent::PhotoRemoved { id });
        true
    }

    /// True when a call to [`Self::load_more`] would actually fetch.
    /// The view binding consults this before reacting to end-proximity.
    pub fn should_load_more(&self) -> bool {
        let st = self.state.lock();
        st.has_more_after && !st.loading_after
    }

    /// True when a call to [`Self::load_more_before`] would actually fetch.
    pub fn should_load_more_before(&self) -> bool {
        let st = self.state.lock();
        st.has_more_before && !st.loading_before
    }

    pub fn has_more_after(&self) -> bool {
        self.state.lock().has_more_after
    }

    pub fn has_more_before(&self) -> bool {
        self.state.lock().has_more_before
    }

    pub fn is_loading_after(&self) -> bool {
        self.state.lock().loading_after
    }

    pub fn is_loading_before(&self) -> bool {
        self.state.lock().loading_before
    }

    /// Date the window was last jumped to, if any.
    pub fn origin(&self) -> Option<DateTime<Utc>> {
        self.state.lock().origin
    }

    /// Generation of the current window; bumped by jumps and refreshes.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn len(&self) -> usize {
        self.state.lock().photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().photos.is_empty()
    }

    /// Snapshot of the loaded photos, in window order.
    pub fn photos(&self) -> Vec<Photo> {
        self.state.lock().photos.clone()
    }

    /// Run `f` over the loaded photos without cloning them out.
    pub fn with_photos<R>(&self, f: impl FnOnce(&[Photo]) -> R) -> R {
        f(&self.state.lock().photos)
    }

    /// Record the view's scroll position. Written on every scroll
    /// event; read back when the view regains focus.
    pub fn set_scroll_offset(&self, offset: f64) {
        self.state.lock().last_scroll_offset = offset;
    }

    pub fn scroll_offset(&self) -> f64 {
        self.state.lock().last_scroll_offset
    }

    /// Ask the view to scroll to `offset` once data is present, e.g.
    /// when remounting a container the user navigated away from.
    pub fn restore_scroll(&self, offset: f64) {
        let mut st = self.state.lock();
        st.last_scroll_offset = offset;
        st.pending_scroll_restoration = true;
    }

    /// True while a scroll restoration is waiting to be applied.
    pub fn pending_scroll_restoration(&self) -> bool {
        self.state.lock().pending_scroll_restoration
    }

    /// Acknowledge an applied restoration. One-shot: the view calls
    /// this right after scrolling, so later renders don't yank the
    /// user back.
    pub fn clear_scroll_restoration(&self) {
        self.state.lock().pending_scroll_restoration = false;
    }

    /// Drain pending change notifications (non-blocking).
    pub fn poll_events(&self) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`) or a bare date
/// (`2024-03-01`).
///
/// A bare date means "land on this day", so it anchors at whichever
/// end of the day the window grows away from: start of day ascending,
/// end of day descending. Timestamps are taken literally.
fn parse_jump_target(s: &str, order: SortOrder) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let time = match order {
        SortOrder::DateAsc => NaiveTime::MIN,
        SortOrder::DateDesc => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?,
    };
    Some(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::FixtureAdapter;
    use crate::models::ContainerKind;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    fn container() -> ContainerRef {
        ContainerRef::new(ContainerKind::Gallery, 3)
    }

    fn make_photo(id: PhotoId, iso: &str) -> Photo {
        Photo {
            id,
            public_id: format!("pub-{id}"),
            taken_at: iso.parse().unwrap(),
            container: container(),
            is_video: false,
            place: None,
        }
    }

    /// `count` photos spread evenly over `days` consecutive days
    /// starting 2024-03-01, ids 1..=count, one-minute spacing.
    fn photos_over_days(count: usize, days: usize) -> Vec<Photo> {
        (0..count)
            .map(|i| {
                let day = 1 + i % days;
                let minute = i / days;
                make_photo(
                    (i + 1) as PhotoId,
                    &format!("2024-03-{day:02}T10:{minute:02}:00Z"),
                )
            })
            .collect()
    }

    fn small_config(page_size: usize) -> TimelineConfig {
        TimelineConfig {
            page_size,
            ..Default::default()
        }
    }

    fn window_ids(window: &PhotoWindow) -> Vec<PhotoId> {
        window.with_photos(|photos| photos.iter().map(|p| p.id).collect())
    }

    /// Opt-in log output for debugging: `RUST_LOG=filmstrip=trace`.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn assert_window_consistent(window: &PhotoWindow) {
        window.with_photos(|photos| {
            let mut seen = HashSet::new();
            for pair in photos.windows(2) {
                assert!(
                    window.order().in_order(pair[0].sort_key(), pair[1].sort_key()),
                    "window out of order: {:?} then {:?}",
                    pair[0].id,
                    pair[1].id
                );
            }
            for p in photos {
                assert!(seen.insert(p.id), "duplicate photo id {}", p.id);
            }
        });
    }

    /// Adapter whose first page fetch parks until the gate opens.
    /// Lets tests hold a fetch in flight while they poke the window.
    struct GatedAdapter {
        inner: FixtureAdapter,
        gate: Notify,
        gate_next: AtomicBool,
    }

    impl GatedAdapter {
        fn new(photos: Vec<Photo>) -> Self {
            Self {
                inner: FixtureAdapter::new(photos),
                gate: Notify::new(),
                gate_next: AtomicBool::new(true),
            }
        }
    }

    #[async_trait]
    impl ContainerAdapter for GatedAdapter {
        async fn fetch_page(&self, req: &PageRequest) -> Result<Vec<Photo>> {
            if self.gate_next.swap(false, Ordering::SeqCst) {
                self.gate.notified().await;
            }
            self.inner.fetch_page(req).await
        }

        async fn fetch_container_meta(
            &self,
            c: ContainerRef,
        ) -> Result<crate::models::ContainerMeta> {
            self.inner.fetch_container_meta(c).await
        }
    }

    /// Adapter that replays canned pages regardless of the request,
    /// for exercising merge behavior the fixture never produces.
    struct CannedAdapter {
        pages: Mutex<Vec<Vec<Photo>>>,
    }

    impl CannedAdapter {
        fn new(mut pages: Vec<Vec<Photo>>) -> Self {
            pages.reverse();
            Self {
                pages: Mutex::new(pages),
            }
        }
    }

    #[async_trait]
    impl ContainerAdapter for CannedAdapter {
        async fn fetch_page(&self, _req: &PageRequest) -> Result<Vec<Photo>> {
            Ok(self.pages.lock().pop().unwrap_or_default())
        }

        async fn fetch_container_meta(
            &self,
            _c: ContainerRef,
        ) -> Result<crate::models::ContainerMeta> {
            unimplemented!("not used in these tests")
        }
    }

    #[tokio::test]
    async fn test_load_more_pages_until_exhausted() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(45, 5)));
        let window = PhotoWindow::with_config(
            adapter.clone(),
            container(),
            SortOrder::DateAsc,
            small_config(20),
        );

        let out = window.load_more().await.unwrap();
        assert_eq!(out, LoadOutcome::Fetched { merged: 20 });
        assert_eq!(window.len(), 20);
        assert!(window.has_more_after());

        window.load_more().await.unwrap();
        let out = window.load_more().await.unwrap();
        assert_eq!(out, LoadOutcome::Fetched { merged: 5 });
        assert_eq!(window.len(), 45);
        assert!(!window.has_more_after());
        assert!(!window.should_load_more());
        assert_window_consistent(&window);

        // Exhausted edge never issues another request.
        let calls = adapter.fetch_count();
        assert_eq!(window.load_more().await.unwrap(), LoadOutcome::NoMore);
        assert_eq!(adapter.fetch_count(), calls);
    }

    #[tokio::test]
    async fn test_short_page_flips_only_that_edge() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(5, 5)));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateAsc,
            small_config(20),
        );

        window.load_more().await.unwrap();
        assert!(!window.has_more_after());
        assert!(window.has_more_before());
        assert!(window.should_load_more_before());
    }

    #[tokio::test]
    async fn test_jump_lands_at_target_and_grows_backward() {
        // Ten photos per day over 2024-03-01..05, ids 1..=50.
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(50, 5)));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateAsc,
            small_config(20),
        );

        window.jump_to_date_str("2024-03-03").await.unwrap();
        assert!(window.pending_scroll_restoration());
        let head = window.photos()[0].clone();
        assert_eq!(head.taken_at.to_rfc3339(), "2024-03-03T10:00:00+00:00");
        assert!(window.has_more_before());

        let out = window.load_more_before().await.unwrap();
        match out {
            LoadOutcome::Fetched { merged } => assert_eq!(merged, 20),
            other => panic!("unexpected outcome {other:?}"),
        }
        // Boundary photo not duplicated, order intact.
        assert_window_consistent(&window);
        assert!(window_ids(&window).contains(&head.id));
    }

    #[tokio::test]
    async fn test_jump_discards_previous_window() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(50, 5)));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateAsc,
            small_config(10),
        );

        window.load_more().await.unwrap();
        let before_jump = window_ids(&window);
        let generation = window.generation();

        window.jump_to_date_str("2024-03-05").await.unwrap();
        assert_eq!(window.generation(), generation + 1);
        let after_jump = window.photos();
        assert!(!after_jump.is_empty());
        for p in &after_jump {
            assert!(p.taken_at >= "2024-03-05T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
            assert!(!before_jump.contains(&p.id));
        }
    }

    #[tokio::test]
    async fn test_invalid_jump_target_rejected_before_fetch() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(10, 2)));
        let window = PhotoWindow::new(adapter.clone(), container(), SortOrder::DateAsc);
        window.load_more().await.unwrap();
        let before = window_ids(&window);

        let err = window.jump_to_date_str("not-a-date").await.unwrap_err();
        assert!(matches!(err, TimelineError::InvalidJumpTarget(_)));
        // No fetch was issued and the window is untouched.
        assert_eq!(adapter.fetch_count(), 1);
        assert_eq!(window_ids(&window), before);
    }

    #[tokio::test]
    async fn test_reentrant_load_issues_single_fetch() {
        init_tracing();
        let adapter = Arc::new(GatedAdapter::new(photos_over_days(45, 5)));
        let window = PhotoWindow::with_config(
            adapter.clone(),
            container(),
            SortOrder::DateAsc,
            small_config(20),
        );

        let (first, second, ()) = tokio::join!(window.load_more(), window.load_more(), async {
            adapter.gate.notify_one();
        });
        assert_eq!(second.unwrap(), LoadOutcome::AlreadyLoading);
        assert_eq!(first.unwrap(), LoadOutcome::Fetched { merged: 20 });
        assert_eq!(adapter.inner.fetch_count(), 1);
        assert_eq!(window.len(), 20);
    }

    #[tokio::test]
    async fn test_jump_racing_inflight_load_drops_stale_page() {
        init_tracing();
        let adapter = Arc::new(GatedAdapter::new(photos_over_days(50, 5)));
        let window = PhotoWindow::with_config(
            adapter.clone(),
            container(),
            SortOrder::DateAsc,
            small_config(10),
        );

        let (stale, jumped) = tokio::join!(window.load_more(), async {
            // Let the first load claim its edge, then jump from under it.
            tokio::task::yield_now().await;
            let out = window.jump_to_date_str("2024-03-04").await;
            adapter.gate.notify_one();
            out
        });

        assert_eq!(stale.unwrap(), LoadOutcome::Stale);
        assert!(matches!(jumped.unwrap(), LoadOutcome::Fetched { .. }));
        // Only the jump's photos survived.
        window.with_photos(|photos| {
            assert!(!photos.is_empty());
            for p in photos {
                assert!(p.taken_at >= "2024-03-04T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
            }
        });
        // The stale resolution must not clear the fresh window's flags
        // by mistake, nor leave its own stuck.
        assert!(!window.is_loading_after());
        assert_window_consistent(&window);
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_flag_and_stays_retryable() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(30, 3)));
        let window = PhotoWindow::with_config(
            adapter.clone(),
            container(),
            SortOrder::DateAsc,
            small_config(10),
        );

        adapter.fail_next_fetches(1);
        let err = window.load_more().await.unwrap_err();
        assert!(matches!(err, TimelineError::Fetch { edge: Edge::After, .. }));
        assert!(window.is_empty());
        assert!(!window.is_loading_after());
        assert!(window.has_more_after());
        assert!(window.should_load_more());

        // Next proximity signal retries and succeeds.
        let out = window.load_more().await.unwrap();
        assert_eq!(out, LoadOutcome::Fetched { merged: 10 });
    }

    #[tokio::test]
    async fn test_before_on_cold_window_is_a_no_op() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(10, 2)));
        let window = PhotoWindow::new(adapter.clone(), container(), SortOrder::DateAsc);

        assert_eq!(
            window.load_more_before().await.unwrap(),
            LoadOutcome::NoMore
        );
        assert_eq!(adapter.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_jump_past_end_still_grows_backward() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(30, 3)));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateAsc,
            small_config(10),
        );

        // Nothing exists at or after 2025; the landing page is empty.
        window.jump_to_date_str("2025-01-01").await.unwrap();
        assert!(window.is_empty());
        assert!(!window.has_more_after());
        assert!(window.has_more_before());

        // The origin date still anchors a backward fetch.
        let out = window.load_more_before().await.unwrap();
        assert_eq!(out, LoadOutcome::Fetched { merged: 10 });
        window.with_photos(|photos| {
            for p in photos {
                assert!(p.taken_at < "2025-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
            }
        });
    }

    #[tokio::test]
    async fn test_descending_order_paginates_and_jumps() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(50, 5)));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateDesc,
            small_config(20),
        );

        window.load_more().await.unwrap();
        // Newest first.
        window.with_photos(|photos| {
            assert_eq!(photos[0].taken_at.to_rfc3339(), "2024-03-05T10:09:00+00:00");
        });
        assert_window_consistent(&window);

        window.jump_to_date_str("2024-03-02").await.unwrap();
        // Desc landing: the newest photo of the target day.
        window.with_photos(|photos| {
            assert_eq!(photos[0].taken_at.to_rfc3339(), "2024-03-02T10:09:00+00:00");
        });
        // Growing backward in desc order pulls newer photos.
        window.load_more_before().await.unwrap();
        assert_window_consistent(&window);
        window.with_photos(|photos| {
            assert_eq!(photos[0].taken_at.to_rfc3339(), "2024-03-04T10:09:00+00:00");
        });
    }

    #[tokio::test]
    async fn test_merge_dedups_overlapping_pages() {
        let overlap = vec![
            vec![
                make_photo(1, "2024-03-01T10:00:00Z"),
                make_photo(2, "2024-03-01T11:00:00Z"),
                make_photo(3, "2024-03-01T12:00:00Z"),
            ],
            // Server overlap at the boundary: id 3 repeats.
            vec![
                make_photo(3, "2024-03-01T12:00:00Z"),
                make_photo(4, "2024-03-01T13:00:00Z"),
            ],
        ];
        let adapter = Arc::new(CannedAdapter::new(overlap));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateAsc,
            small_config(3),
        );

        window.load_more().await.unwrap();
        let out = window.load_more().await.unwrap();
        assert_eq!(out, LoadOutcome::Fetched { merged: 1 });
        assert_eq!(window_ids(&window), vec![1, 2, 3, 4]);
        assert_window_consistent(&window);
    }

    #[tokio::test]
    async fn test_refresh_keeps_position_and_picks_up_edits() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(30, 3)));
        let window = PhotoWindow::with_config(
            adapter.clone(),
            container(),
            SortOrder::DateAsc,
            small_config(10),
        );
        window.load_more().await.unwrap();
        window.set_scroll_offset(420.0);
        let head = window.photos()[0].clone();

        // A photo from the loaded page disappears server-side.
        assert!(window_ids(&window).contains(&4));
        let mut remaining = photos_over_days(30, 3);
        remaining.retain(|p| p.id != 4);
        adapter.set_photos(remaining);

        window.refresh().await.unwrap();
        assert!(!window_ids(&window).contains(&4));
        // Still anchored where the user was, scroll untouched.
        assert_eq!(window.photos()[0].taken_at, head.taken_at);
        assert_eq!(window.scroll_offset(), 420.0);
        assert!(!window.pending_scroll_restoration());
    }

    #[tokio::test]
    async fn test_remove_photo_keeps_window_intact() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(10, 2)));
        let window = PhotoWindow::new(adapter, container(), SortOrder::DateAsc);
        window.load_more().await.unwrap();

        assert!(window.remove_photo(4));
        assert!(!window.remove_photo(4));
        assert_eq!(window.len(), 9);
        assert!(!window_ids(&window).contains(&4));
        assert!(window
            .poll_events()
            .contains(&WindowEvent::PhotoRemoved { id: 4 }));
    }

    #[tokio::test]
    async fn test_scroll_restoration_is_one_shot() {
        let adapter = Arc::new(FixtureAdapter::new(Vec::new()));
        let window = PhotoWindow::new(adapter, container(), SortOrder::DateAsc);

        window.restore_scroll(987.5);
        assert!(window.pending_scroll_restoration());
        assert_eq!(window.scroll_offset(), 987.5);

        window.clear_scroll_restoration();
        assert!(!window.pending_scroll_restoration());
        // The offset itself survives; only the signal is one-shot.
        assert_eq!(window.scroll_offset(), 987.5);

        window.set_scroll_offset(10.0);
        assert!(!window.pending_scroll_restoration());
    }

    #[tokio::test]
    async fn test_events_reflect_window_changes() {
        let adapter = Arc::new(FixtureAdapter::new(photos_over_days(5, 1)));
        let window = PhotoWindow::with_config(
            adapter,
            container(),
            SortOrder::DateAsc,
            small_config(20),
        );

        window.load_more().await.unwrap();
        let events = window.poll_events();
        assert!(events.contains(&WindowEvent::EdgeExhausted { edge: Edge::After }));
        assert!(events.contains(&WindowEvent::PageLoaded {
            edge: Edge::After,
            merged: 5,
            total: 5,
        }));

        window.jump_to_date_str("2024-03-01").await.unwrap();
        let events = window.poll_events();
        assert!(matches!(events.first(), Some(WindowEvent::Reset { .. })));
    }

    #[test]
    fn test_parse_jump_target_forms() {
        assert_eq!(
            parse_jump_target("2024-03-01", SortOrder::DateAsc)
                .unwrap()
                .to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        // Desc anchors a bare date at the end of the day so the jump
        // still lands on that day's photos.
        assert_eq!(
            parse_jump_target("2024-03-01", SortOrder::DateDesc)
                .unwrap()
                .to_rfc3339(),
            "2024-03-01T23:59:59.999999999+00:00"
        );
        assert_eq!(
            parse_jump_target("2024-03-01T15:30:00+02:00", SortOrder::DateAsc)
                .unwrap()
                .to_rfc3339(),
            "2024-03-01T13:30:00+00:00"
        );
        assert!(parse_jump_target("march 1st", SortOrder::DateAsc).is_none());
        assert!(parse_jump_target("", SortOrder::DateDesc).is_none());
    }
}
