//! Click context - the per-event value handed to click handlers.
//!
//! Constructed fresh for every routed click and discarded when the
//! click's processing completes. Bundles the acting user, the surface,
//! the cell, a content snapshot taken at click time, the classified
//! click, cancellation, and event-scoped metadata that is independent
//! of slot metadata.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::host::Host;
use crate::manager::SurfaceManager;
use crate::surface::{MetaValue, Surface};
use crate::types::Click;

/// Everything a click handler can know and do about one click.
pub struct ClickContext<'a, H: Host> {
    manager: &'a SurfaceManager<H>,
    user: H::User,
    surface: Surface<H>,
    cell: usize,
    content: Option<H::Content>,
    click: Click,
    cancelled: bool,
    metadata: HashMap<String, MetaValue>,
}

impl<'a, H: Host> ClickContext<'a, H> {
    pub(crate) fn new(
        manager: &'a SurfaceManager<H>,
        user: H::User,
        surface: Surface<H>,
        cell: usize,
        content: Option<H::Content>,
        click: Click,
    ) -> Self {
        Self {
            manager,
            user,
            surface,
            cell,
            content,
            click,
            cancelled: false,
            metadata: HashMap::new(),
        }
    }

    /// The user who clicked.
    pub fn user(&self) -> &H::User {
        &self.user
    }

    /// The surface that was clicked.
    pub fn surface(&self) -> &Surface<H> {
        &self.surface
    }

    /// The clicked cell index.
    pub fn cell(&self) -> usize {
        self.cell
    }

    /// Snapshot of the cell's content at click time.
    pub fn content(&self) -> Option<&H::Content> {
        self.content.as_ref()
    }

    /// The classified click (button + modifiers).
    pub fn click(&self) -> Click {
        self.click
    }

    /// Cancel the underlying raw event. Idempotent; there is no way to
    /// un-cancel.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// True once [`cancel`](ClickContext::cancel) has been called (or
    /// the surface forced cancellation, e.g. view-only).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Close the surface for the acting user. Delegates to the manager,
    /// so the close hook fires and the session mapping is removed.
    pub fn close(&mut self) {
        self.manager.close(&self.user);
    }

    // -------------------------------------------------------------------------
    // Event-scoped metadata
    // -------------------------------------------------------------------------

    /// Store a value for the remainder of this click's processing.
    /// Discarded when the click completes; separate from slot metadata.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Any + Send + Sync) {
        self.metadata.insert(key.into(), Arc::new(value));
    }

    /// Fetch an event-scoped value, downcast to `T`.
    pub fn meta<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.metadata
            .get(key)
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn has_meta(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }
}

// =============================================================================
// Tests
// =============================================================================
