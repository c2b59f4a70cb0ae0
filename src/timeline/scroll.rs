//! Scroll position memory for the owning navigation layer.
//!
//! A window only tracks scroll while it lives; when a container view
//! unmounts the window is dropped with it. The navigation layer keeps
//! one [`ScrollMemory`] around instead, saving the offset on unmount
//! and seeding the replacement window with it on the way back.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::models::ContainerRef;
use crate::timeline::PhotoWindow;

/// Last known scroll offset per container, across window lifetimes.
#[derive(Default)]
pub struct ScrollMemory {
    offsets: RwLock<HashMap<ContainerRef, f64>>,
}

impl ScrollMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, container: ContainerRef, offset: f64) {
        trace!(?container, offset, "saved scroll offset");
        self.offsets.write().insert(container, offset);
    }

    pub fn recall(&self, container: ContainerRef) -> Option<f64> {
        self.offsets.read().get(&container).copied()
    }

    pub fn forget(&self, container: ContainerRef) {
        self.offsets.write().remove(&container);
    }

    pub fn clear(&self) {
        self.offsets.write().clear();
    }

    /// Save a window's current offset under its container. Called on
    /// unmount, right before the window is dropped.
    pub fn persist_from(&self, window: &PhotoWindow) {
        self.save(window.container(), window.scroll_offset());
    }

    /// Seed a fresh window with the remembered offset and raise its
    /// restoration flag. Returns false when nothing was remembered.
    pub fn apply_to(&self, window: &PhotoWindow) -> bool {
        match self.recall(window.container()) {
            Some(offset) => {
                window.restore_scroll(offset);
                true
            }
            None => false,
        }
    }
}
