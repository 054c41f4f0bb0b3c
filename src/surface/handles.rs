//! Selection handles - fluent views over one, a range, or a set of cells.
//!
//! All three handle types expose the same bulk API through the [`Slots`]
//! trait: fills, handler assignment, enable/disable, iteration and
//! predicate narrowing. Operations are synchronous, immediate, and touch
//! only the targeted surface's slot state - no hidden global state.
//!
//! Indices outside the grid are skipped silently; bulk operations favor
//! robustness over strictness.
//!
//! # Example
//!
//! ```ignore
//! // Border fill, leaving occupied cells alone.
//! surface.range(0, 8).fill_empty("pane".to_string());
//!
//! // Every third cell becomes a buy button.
//! surface
//!     .all()
//!     .filter(|index, _| index % 3 == 0)
//!     .on_click(|ctx| ctx.cancel());
//! ```

use std::sync::Arc;

use crate::click::ClickContext;
use crate::host::Host;
use crate::surface::Surface;

// =============================================================================
// Slots trait
// =============================================================================

/// Uniform bulk API over a set of cells.
///
/// Implemented by [`SlotHandle`], [`RangeHandle`] and [`MultiHandle`];
/// every operation applies to each targeted in-range cell in iteration
/// order.
pub trait Slots<H: Host> {
    /// The surface these cells belong to.
    fn surface(&self) -> &Surface<H>;

    /// Targeted cell indices in iteration order, unfiltered.
    fn indices(&self) -> Vec<usize>;

    /// Targeted indices that actually fall inside the grid.
    fn valid_indices(&self) -> Vec<usize> {
        let size = self.surface().size();
        self.indices().into_iter().filter(|i| *i < size).collect()
    }

    /// Put `content` into every cell.
    fn fill(&self, content: H::Content) {
        for index in self.valid_indices() {
            self.surface().set_content(index, Some(content.clone()));
        }
    }

    /// Put `content` into every cell that is currently empty.
    fn fill_empty(&self, content: H::Content) {
        for index in self.valid_indices() {
            if self.surface().content(index).is_none() {
                self.surface().set_content(index, Some(content.clone()));
            }
        }
    }

    /// Alternate `first` and `second` across the cells in iteration
    /// order.
    fn fill_alternating(&self, first: H::Content, second: H::Content) {
        for (position, index) in self.valid_indices().into_iter().enumerate() {
            let content = if position % 2 == 0 {
                first.clone()
            } else {
                second.clone()
            };
            self.surface().set_content(index, Some(content));
        }
    }

    /// Empty every cell (content only; handlers and flags survive).
    fn clear(&self) {
        for index in self.valid_indices() {
            self.surface().set_content(index, None);
        }
    }

    /// Assign the same click handler to every cell.
    fn on_click(&self, handler: impl Fn(&mut ClickContext<'_, H>) + Send + Sync + 'static) {
        let handler: Arc<dyn Fn(&mut ClickContext<'_, H>) + Send + Sync> = Arc::new(handler);
        for index in self.valid_indices() {
            let handler = handler.clone();
            self.surface()
                .with_slot(index, move |slot| slot.set_handler(Some(handler)));
        }
    }

    /// Remove the click handler from every cell.
    fn clear_click(&self) {
        for index in self.valid_indices() {
            self.surface().with_slot(index, |slot| slot.set_handler(None));
        }
    }

    /// Disable every cell. Clicks are intercepted and `message` is shown
    /// instead of invoking the handler.
    fn disable(&self, message: impl Into<String>) {
        let message = message.into();
        for index in self.valid_indices() {
            let message = message.clone();
            self.surface()
                .with_slot(index, move |slot| slot.set_enabled(false, Some(message)));
        }
    }

    /// Re-enable every cell.
    fn enable(&self) {
        for index in self.valid_indices() {
            self.surface()
                .with_slot(index, |slot| slot.set_enabled(true, None));
        }
    }

    /// Store a metadata value on every cell.
    fn set_meta(&self, key: impl Into<String>, value: impl std::any::Any + Send + Sync) {
        let key = key.into();
        let value: super::MetaValue = Arc::new(value);
        for index in self.valid_indices() {
            let key = key.clone();
            let value = value.clone();
            self.surface()
                .with_slot(index, move |slot| slot.set_meta(key, value));
        }
    }

    /// Visit every in-range index in iteration order.
    fn for_each_index(&self, mut f: impl FnMut(usize)) {
        for index in self.valid_indices() {
            f(index);
        }
    }

    /// Visit every in-range cell with its current content.
    fn for_each(&self, mut f: impl FnMut(usize, Option<H::Content>)) {
        for index in self.valid_indices() {
            f(index, self.surface().content(index));
        }
    }

    /// Narrow to the cells matching `predicate`, enabling composition.
    fn filter(
        &self,
        predicate: impl Fn(usize, Option<&H::Content>) -> bool,
    ) -> MultiHandle<H> {
        let mut kept = Vec::new();
        for index in self.valid_indices() {
            let content = self.surface().content(index);
            if predicate(index, content.as_ref()) {
                kept.push(index);
            }
        }
        MultiHandle::new(self.surface().clone(), kept)
    }
}

// =============================================================================
// Slot handle
// =============================================================================

/// Handle over a single cell.
pub struct SlotHandle<H: Host> {
    surface: Surface<H>,
    index: usize,
}

impl<H: Host> SlotHandle<H> {
    pub(crate) fn new(surface: Surface<H>, index: usize) -> Self {
        Self { surface, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Set this cell's content.
    pub fn set(&self, content: H::Content) {
        self.surface.set_content(self.index, Some(content));
    }

    /// This cell's current content.
    pub fn content(&self) -> Option<H::Content> {
        self.surface.content(self.index)
    }

    /// Fetch a slot metadata value, downcast to `T`.
    pub fn meta<T: std::any::Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let mut raw = None;
        self.surface.with_slot(self.index, |slot| {
            raw = slot.meta_raw(key);
        });
        raw.and_then(|value| value.downcast::<T>().ok())
    }
}

impl<H: Host> Slots<H> for SlotHandle<H> {
    fn surface(&self) -> &Surface<H> {
        &self.surface
    }

    fn indices(&self) -> Vec<usize> {
        vec![self.index]
    }
}

// =============================================================================
// Range handle
// =============================================================================

/// Handle over a contiguous inclusive range of cells.
///
/// Construction normalizes reversed bounds: `range(8, 2)` targets the
/// same cells as `range(2, 8)`.
pub struct RangeHandle<H: Host> {
    surface: Surface<H>,
    start: usize,
    end: usize,
}

impl<H: Host> RangeHandle<H> {
    pub(crate) fn new(surface: Surface<H>, start: usize, end: usize) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self { surface, start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

impl<H: Host> Slots<H> for RangeHandle<H> {
    fn surface(&self) -> &Surface<H> {
        &self.surface
    }

    fn indices(&self) -> Vec<usize> {
        (self.start..=self.end).collect()
    }
}

// =============================================================================
// Multi handle
// =============================================================================

/// Handle over an arbitrary list of cells, in the order given.
pub struct MultiHandle<H: Host> {
    surface: Surface<H>,
    cells: Vec<usize>,
}

impl<H: Host> MultiHandle<H> {
    pub(crate) fn new(surface: Surface<H>, cells: Vec<usize>) -> Self {
        Self { surface, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<H: Host> Slots<H> for MultiHandle<H> {
    fn surface(&self) -> &Surface<H> {
        &self.surface
    }

    fn indices(&self) -> Vec<usize> {
        self.cells.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
