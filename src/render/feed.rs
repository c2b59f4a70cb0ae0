//! Timeline feed: the surface a list view binds to.
//!
//! Owns one [`PhotoWindow`] plus the container metadata that picks
//! the grouping strategy, and turns the window into the flat render
//! sequence on demand. Proximity callbacks from the list land here
//! and are forwarded to the window behind its backpressure
//! predicates, so the view never has to inspect loading flags itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::adapter::ContainerAdapter;
use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::grouping::{determine_grouping_strategy, GroupingStrategy};
use crate::models::{ContainerMeta, ContainerRef, DateJump, SortOrder};
use crate::render::cache::{RenderCache, RenderKey};
use crate::render::items::{build_render_items, RenderItem};
use crate::timeline::{LoadOutcome, PhotoWindow};

/// One mounted container timeline, ready to feed a virtualized list.
pub struct TimelineFeed {
    adapter: Arc<dyn ContainerAdapter>,
    window: PhotoWindow,
    config: TimelineConfig,
    columns: RwLock<usize>,
    meta: RwLock<Option<ContainerMeta>>,
    strategy: RwLock<GroupingStrategy>,
    cache: RenderCache,
}

impl TimelineFeed {
    pub fn new(
        adapter: Arc<dyn ContainerAdapter>,
        container: ContainerRef,
        order: SortOrder,
        columns: usize,
    ) -> Self {
        Self::with_config(adapter, container, order, columns, TimelineConfig::default())
    }

    pub fn with_config(
        adapter: Arc<dyn ContainerAdapter>,
        container: ContainerRef,
        order: SortOrder,
        columns: usize,
        config: TimelineConfig,
    ) -> Self {
        let window = PhotoWindow::with_config(adapter.clone(), container, order, config);
        Self {
            adapter,
            window,
            config,
            columns: RwLock::new(columns.max(1)),
            meta: RwLock::new(None),
            // Pre-mount default; replaced once metadata arrives.
            strategy: RwLock::new(GroupingStrategy::Day),
            cache: RenderCache::new(),
        }
    }

    /// Fetch container metadata, pick the grouping strategy, and load
    /// the first page. Called once when the container view appears.
    pub async fn mount(&self) -> Result<(), TimelineError> {
        let meta = self
            .adapter
            .fetch_container_meta(self.window.container())
            .await
            .map_err(TimelineError::Meta)?;
        let strategy = determine_grouping_strategy(&meta, &self.config.grouping);
        debug!(
            ?strategy,
            total = meta.total_count,
            container = ?self.window.container(),
            "timeline feed mounted"
        );
        *self.strategy.write() = strategy;
        *self.meta.write() = Some(meta);
        self.window.load_more().await?;
        Ok(())
    }

    /// The list scrolled near its end. Loads forward unless the edge
    /// is exhausted or already fetching. Fetch errors are logged and
    /// swallowed: the window stays retryable and the failure is
    /// available through its events.
    pub async fn on_near_end(&self) {
        if !self.window.should_load_more() {
            return;
        }
        if let Err(e) = self.window.load_more().await {
            warn!(error = %e, "near-end load failed");
        }
    }

    /// The list scrolled near its start. Counterpart of
    /// [`Self::on_near_end`].
    pub async fn on_near_start(&self) {
        if !self.window.should_load_more_before() {
            return;
        }
        if let Err(e) = self.window.load_more_before().await {
            warn!(error = %e, "near-start load failed");
        }
    }

    /// Restart the timeline at a date, e.g. from the jump sidebar.
    pub async fn jump_to_date(&self, target: DateTime<Utc>) -> Result<LoadOutcome, TimelineError> {
        self.window.jump_to_date(target).await
    }

    /// [`Self::jump_to_date`] for text targets (deep links, URL params).
    pub async fn jump_to_date_str(&self, target: &str) -> Result<LoadOutcome, TimelineError> {
        self.window.jump_to_date_str(target).await
    }

    /// Reload the window in place, keeping scroll position.
    pub async fn refresh(&self) -> Result<LoadOutcome, TimelineError> {
        self.refresh_meta().await?;
        self.window.refresh().await
    }

    /// Re-fetch container metadata and re-pick the grouping strategy,
    /// for containers that changed size since mount.
    async fn refresh_meta(&self) -> Result<(), TimelineError> {
        let meta = self
            .adapter
            .fetch_container_meta(self.window.container())
            .await
            .map_err(TimelineError::Meta)?;
        *self.strategy.write() = determine_grouping_strategy(&meta, &self.config.grouping);
        *self.meta.write() = Some(meta);
        Ok(())
    }

    /// Build (or fetch from cache) the flat sequence the list renders.
    /// Each item carries a stable key via [`RenderItem::key`].
    pub fn render_items(&self) -> Vec<RenderItem> {
        let strategy = self.strategy();
        let columns = self.columns();
        let loading_before = self.window.is_loading_before();
        let loading_after = self.window.is_loading_after();
        let key = RenderKey {
            list_hash: self.window.with_photos(RenderCache::compute_list_hash),
            strategy,
            columns: columns as u32,
            loading_before,
            loading_after,
        };
        if let Some(items) = self.cache.get(key) {
            return items;
        }
        let items = self.window.with_photos(|photos| {
            build_render_items(photos, strategy, columns, loading_before, loading_after)
        });
        self.cache.set(key, items.clone());
        items
    }

    /// Jump shortcuts advertised by the container, for a sidebar.
    pub fn date_jumps(&self) -> Vec<DateJump> {
        self.meta
            .read()
            .as_ref()
            .map(|m| m.date_jumps.clone())
            .unwrap_or_default()
    }

    pub fn meta(&self) -> Option<ContainerMeta> {
        self.meta.read().clone()
    }

    pub fn strategy(&self) -> GroupingStrategy {
        *self.strategy.read()
    }

    pub fn columns(&self) -> usize {
        *self.columns.read()
    }

    /// Change the grid width, e.g. on viewport resize. Takes effect
    /// on the next [`Self::render_items`] call.
    pub fn set_columns(&self, columns: usize) {
        *self.columns.write() = columns.max(1);
    }

    /// The underlying window, for scroll persistence, events, and
    /// photo-level operations.
    pub fn window(&self) -> &PhotoWindow {
        &self.window
    }
}
