//! Surfaces - fixed-size grid menus and their per-cell state.
//!
//! A [`Surface`] owns one [`SlotState`] per grid cell, a surface-scoped
//! metadata bag, a stable identity and its lifecycle hooks. It is a
//! cheap-clone handle (`Arc` inside); the manager's session map, the
//! animation engine and the pagination engine all hold clones of the
//! same surface.
//!
//! Grid size is fixed at construction and validated to be non-zero;
//! there is deliberately no resize operation. Every cell-indexed
//! operation is permissive: an index outside `[0, size)` is a no-op,
//! never a panic.
//!
//! # Example
//!
//! ```ignore
//! use menukit::{Surface, Slots};
//!
//! let surface = Surface::new(host, "Quests", 27)?;
//! surface.slot(13).set("golden-compass".to_string());
//! surface.range(18, 26).disable("Locked until level 10");
//! ```

mod handles;

pub use handles::{MultiHandle, RangeHandle, SlotHandle, Slots};

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::trace;

use crate::click::ClickContext;
use crate::error::ConfigError;
use crate::host::Host;
use crate::types::{Generation, Notice, SurfaceId};

/// Rejection message shown when a disabled cell is clicked and the slot
/// carries no message of its own.
pub const DEFAULT_DISABLED_MESSAGE: &str = "You can't use that right now.";

/// Type-erased metadata value. Downcast through the typed accessors.
pub type MetaValue = Arc<dyn Any + Send + Sync>;

/// Per-cell click handler.
pub type ClickHandler<H> = Arc<dyn Fn(&mut ClickContext<'_, H>) + Send + Sync>;

/// Lifecycle hook (open/close), invoked with the acting user.
pub type LifecycleHandler<H> =
    Arc<dyn Fn(&<H as Host>::User, &Surface<H>) + Send + Sync>;

// =============================================================================
// Slot state
// =============================================================================

/// Per-cell state: displayed content, click handler, enabled flag and
/// session-scoped metadata.
///
/// Created implicitly when the surface is constructed (one per cell,
/// empty and enabled) and mutated only through surface operations and
/// selection handles.
pub struct SlotState<H: Host> {
    content: Option<H::Content>,
    handler: Option<ClickHandler<H>>,
    enabled: bool,
    disabled_message: Option<String>,
    metadata: HashMap<String, MetaValue>,
}

impl<H: Host> SlotState<H> {
    fn new() -> Self {
        Self {
            content: None,
            handler: None,
            enabled: true,
            disabled_message: None,
            metadata: HashMap::new(),
        }
    }

    pub fn content(&self) -> Option<&H::Content> {
        self.content.as_ref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn disabled_message(&self) -> Option<&str> {
        self.disabled_message.as_deref()
    }

    pub(crate) fn set_handler(&mut self, handler: Option<ClickHandler<H>>) {
        self.handler = handler;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool, message: Option<String>) {
        self.enabled = enabled;
        self.disabled_message = message;
    }

    pub(crate) fn set_meta(&mut self, key: String, value: MetaValue) {
        self.metadata.insert(key, value);
    }

    pub(crate) fn meta_raw(&self, key: &str) -> Option<MetaValue> {
        self.metadata.get(key).cloned()
    }

    /// Reset to the freshly-constructed state (empty, enabled, no
    /// handler, no metadata). Content clearing is handled by the caller
    /// so the host write goes through the surface.
    fn reset_non_content(&mut self) {
        self.handler = None;
        self.enabled = true;
        self.disabled_message = None;
        self.metadata.clear();
    }
}

/// Snapshot of the parts of a slot the click path needs, taken under the
/// slot lock and used after it is released.
pub(crate) struct ClickTarget<H: Host> {
    pub content: Option<H::Content>,
    pub handler: Option<ClickHandler<H>>,
    pub enabled: bool,
    pub rejection: Notice,
}

// =============================================================================
// Surface
// =============================================================================

struct Hooks<H: Host> {
    on_open: Option<LifecycleHandler<H>>,
    on_close: Option<LifecycleHandler<H>>,
    on_global_click: Option<ClickHandler<H>>,
}

struct SurfaceInner<H: Host> {
    id: SurfaceId,
    title: String,
    size: usize,
    host: Arc<H>,
    view_only: AtomicBool,
    /// Generation stamped at open time; `None` until first opened.
    generation: Mutex<Option<Generation>>,
    /// Guards the close hook so it fires at most once per open.
    close_emitted: AtomicBool,
    slots: Mutex<Vec<SlotState<H>>>,
    metadata: Mutex<HashMap<String, MetaValue>>,
    hooks: Mutex<Hooks<H>>,
}

/// A fixed-size grid menu shown to one user at a time.
///
/// Cheap to clone; all clones refer to the same underlying state.
pub struct Surface<H: Host> {
    inner: Arc<SurfaceInner<H>>,
}

impl<H: Host> Clone for Surface<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> PartialEq for Surface<H> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl<H: Host> Eq for Surface<H> {}

impl<H: Host> fmt::Debug for Surface<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.inner.id)
            .field("title", &self.inner.title)
            .field("size", &self.inner.size)
            .finish()
    }
}

impl<H: Host> Surface<H> {
    /// Create a surface with a fixed grid of `size` cells.
    ///
    /// Fails fast on a zero-cell grid rather than tolerating it.
    pub fn new(
        host: Arc<H>,
        title: impl Into<String>,
        size: usize,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let slots = (0..size).map(|_| SlotState::new()).collect();
        Ok(Self {
            inner: Arc::new(SurfaceInner {
                id: SurfaceId::next(),
                title: title.into(),
                size,
                host,
                view_only: AtomicBool::new(false),
                generation: Mutex::new(None),
                close_emitted: AtomicBool::new(false),
                slots: Mutex::new(slots),
                metadata: Mutex::new(HashMap::new()),
                hooks: Mutex::new(Hooks {
                    on_open: None,
                    on_close: None,
                    on_global_click: None,
                }),
            }),
        })
    }

    pub fn id(&self) -> SurfaceId {
        self.inner.id
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Number of grid cells, fixed for the surface's lifetime.
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// When true, every raw click on this surface is cancelled at the
    /// host level regardless of per-slot state.
    pub fn view_only(&self) -> bool {
        self.inner.view_only.load(Ordering::SeqCst)
    }

    pub fn set_view_only(&self, view_only: bool) {
        self.inner.view_only.store(view_only, Ordering::SeqCst);
    }

    pub(crate) fn host(&self) -> &Arc<H> {
        &self.inner.host
    }

    // -------------------------------------------------------------------------
    // Generation tag
    // -------------------------------------------------------------------------

    /// The generation this surface was last opened under, if ever.
    pub fn generation(&self) -> Option<Generation> {
        *self.inner.generation.lock()
    }

    /// Stamp the surface with the generation current at open time and
    /// re-arm the close hook.
    pub(crate) fn stamp(&self, generation: Generation) {
        *self.inner.generation.lock() = Some(generation);
        self.inner.close_emitted.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Cell content
    // -------------------------------------------------------------------------

    /// Write one cell, updating slot state and the host display.
    ///
    /// No-op for an out-of-range index.
    pub fn set_content(&self, index: usize, content: Option<H::Content>) {
        if index >= self.inner.size {
            return;
        }
        {
            let mut slots = self.inner.slots.lock();
            slots[index].content = content.clone();
        }
        trace!(surface = %self.inner.id, index, "cell write");
        self.inner.host.write_cell(self.inner.id, index, content.as_ref());
    }

    /// The logical content of a cell, or `None` if empty or out of range.
    pub fn content(&self, index: usize) -> Option<H::Content> {
        let slots = self.inner.slots.lock();
        slots.get(index).and_then(|slot| slot.content.clone())
    }

    /// What the host display currently shows in a cell.
    ///
    /// Diff baselines are captured from this, not from slot state, so
    /// the first frame diffs against reality.
    pub fn displayed(&self, index: usize) -> Option<H::Content> {
        if index >= self.inner.size {
            return None;
        }
        self.inner.host.read_cell(self.inner.id, index)
    }

    /// Run `f` against the slot at `index`. Returns false (without
    /// calling `f`) when the index is out of range.
    pub(crate) fn with_slot(&self, index: usize, f: impl FnOnce(&mut SlotState<H>)) -> bool {
        let mut slots = self.inner.slots.lock();
        match slots.get_mut(index) {
            Some(slot) => {
                f(slot);
                true
            }
            None => false,
        }
    }

    /// Clear content, handler, enabled flag and metadata of one cell.
    pub(crate) fn reset_slot(&self, index: usize) {
        if !self.with_slot(index, |slot| slot.reset_non_content()) {
            return;
        }
        self.set_content(index, None);
    }

    /// Snapshot the click-relevant parts of a slot.
    pub(crate) fn click_target(&self, index: usize) -> Option<ClickTarget<H>> {
        let slots = self.inner.slots.lock();
        slots.get(index).map(|slot| ClickTarget {
            content: slot.content.clone(),
            handler: slot.handler.clone(),
            enabled: slot.enabled,
            rejection: Notice::failure(
                slot.disabled_message
                    .as_deref()
                    .unwrap_or(DEFAULT_DISABLED_MESSAGE),
            ),
        })
    }

    // -------------------------------------------------------------------------
    // Surface metadata
    // -------------------------------------------------------------------------

    /// Store a surface-scoped metadata value under `key`.
    pub fn set_meta(&self, key: impl Into<String>, value: impl Any + Send + Sync) {
        self.inner
            .metadata
            .lock()
            .insert(key.into(), Arc::new(value));
    }

    /// Fetch a surface-scoped metadata value, downcast to `T`.
    pub fn meta<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let raw = self.inner.metadata.lock().get(key).cloned()?;
        raw.downcast::<T>().ok()
    }

    pub fn has_meta(&self, key: &str) -> bool {
        self.inner.metadata.lock().contains_key(key)
    }

    // -------------------------------------------------------------------------
    // Lifecycle hooks
    // -------------------------------------------------------------------------

    /// Hook invoked after the surface is shown to a user.
    pub fn on_open(&self, f: impl Fn(&H::User, &Surface<H>) + Send + Sync + 'static) {
        self.inner.hooks.lock().on_open = Some(Arc::new(f));
    }

    /// Hook invoked when the surface is closed for a user. Fires at most
    /// once per open.
    pub fn on_close(&self, f: impl Fn(&H::User, &Surface<H>) + Send + Sync + 'static) {
        self.inner.hooks.lock().on_close = Some(Arc::new(f));
    }

    /// Hook invoked after the per-slot handler for every in-grid click.
    pub fn on_global_click(
        &self,
        f: impl Fn(&mut ClickContext<'_, H>) + Send + Sync + 'static,
    ) {
        self.inner.hooks.lock().on_global_click = Some(Arc::new(f));
    }

    pub(crate) fn emit_open(&self, user: &H::User) {
        let hook = self.inner.hooks.lock().on_open.clone();
        if let Some(hook) = hook {
            hook(user, self);
        }
    }

    /// Invoke the close hook, at most once per open cycle.
    pub(crate) fn emit_close(&self, user: &H::User) {
        if self.inner.close_emitted.swap(true, Ordering::SeqCst) {
            return;
        }
        let hook = self.inner.hooks.lock().on_close.clone();
        if let Some(hook) = hook {
            hook(user, self);
        }
    }

    pub(crate) fn global_click_handler(&self) -> Option<ClickHandler<H>> {
        self.inner.hooks.lock().on_global_click.clone()
    }

    // -------------------------------------------------------------------------
    // Selection handles
    // -------------------------------------------------------------------------

    /// Handle over a single cell.
    pub fn slot(&self, index: usize) -> SlotHandle<H> {
        SlotHandle::new(self.clone(), index)
    }

    /// Handle over a contiguous inclusive range. Reversed bounds are
    /// normalized.
    pub fn range(&self, start: usize, end: usize) -> RangeHandle<H> {
        RangeHandle::new(self.clone(), start, end)
    }

    /// Handle over an arbitrary set of cells.
    pub fn cells(&self, indices: impl IntoIterator<Item = usize>) -> MultiHandle<H> {
        MultiHandle::new(self.clone(), indices.into_iter().collect())
    }

    /// Handle over every cell in the grid.
    pub fn all(&self) -> RangeHandle<H> {
        RangeHandle::new(self.clone(), 0, self.inner.size - 1)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHost;
    use pretty_assertions::assert_eq;

    fn fixture() -> (Arc<TestHost>, Surface<TestHost>) {
        let host = Arc::new(TestHost::new());
        let surface = Surface::new(host.clone(), "test", 9).unwrap();
        (host, surface)
    }

    #[test]
    fn test_zero_size_rejected() {
        let host = Arc::new(TestHost::new());
        assert_eq!(
            Surface::new(host, "bad", 0).unwrap_err(),
            ConfigError::EmptyGrid
        );
    }

    #[test]
    fn test_content_writes_through_to_host() {
        let (host, surface) = fixture();
        surface.set_content(4, Some("emerald".to_string()));

        assert_eq!(surface.content(4), Some("emerald".to_string()));
        assert_eq!(host.cell(surface.id(), 4), Some("emerald".to_string()));

        surface.set_content(4, None);
        assert_eq!(surface.content(4), None);
        assert_eq!(host.cell(surface.id(), 4), None);
    }

    #[test]
    fn test_out_of_range_write_is_noop() {
        let (host, surface) = fixture();
        surface.set_content(9, Some("ghost".to_string()));
        surface.set_content(usize::MAX, Some("ghost".to_string()));

        assert_eq!(host.write_count(), 0);
        assert_eq!(surface.content(9), None);
    }

    #[test]
    fn test_displayed_reads_host_reality() {
        let (host, surface) = fixture();
        // Something else wrote to the container behind the surface's back.
        host.put_cell(surface.id(), 2, "intruder".to_string());

        assert_eq!(surface.displayed(2), Some("intruder".to_string()));
        assert_eq!(surface.content(2), None);
        assert_eq!(surface.displayed(100), None);
    }

    #[test]
    fn test_typed_metadata() {
        let (_, surface) = fixture();
        surface.set_meta("page", 7usize);
        surface.set_meta("owner", "alice".to_string());

        assert_eq!(surface.meta::<usize>("page").as_deref(), Some(&7));
        assert_eq!(
            surface.meta::<String>("owner").as_deref(),
            Some(&"alice".to_string())
        );
        // Wrong type or missing key both come back empty.
        assert!(surface.meta::<u32>("page").is_none());
        assert!(surface.meta::<usize>("missing").is_none());
        assert!(surface.has_meta("page"));
        assert!(!surface.has_meta("missing"));
    }

    #[test]
    fn test_clones_share_state() {
        let (_, surface) = fixture();
        let other = surface.clone();
        other.set_content(0, Some("shared".to_string()));

        assert_eq!(surface.content(0), Some("shared".to_string()));
        assert_eq!(surface, other);
    }

    #[test]
    fn test_close_hook_fires_once_per_open() {
        let (_, surface) = fixture();
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let c = count.clone();
        surface.on_close(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        surface.stamp(Generation::next());
        surface.emit_close(&"alice");
        surface.emit_close(&"alice");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Re-opening re-arms the hook.
        surface.stamp(Generation::next());
        surface.emit_close(&"alice");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_view_only_flag() {
        let (_, surface) = fixture();
        assert!(!surface.view_only());
        surface.set_view_only(true);
        assert!(surface.view_only());
    }
}
