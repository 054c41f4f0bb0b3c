//! Pagination - slicing datasets into a fixed set of content cells.
//!
//! A [`Paginator`] bridges a dataset (eagerly materialized, or fetched
//! asynchronously page by page) to a surface: it renders the current
//! page into its content cells, wires per-item click handlers, keeps
//! previous/next navigation controls in sync, and guards against
//! overlapping loads.
//!
//! # State machine
//!
//! ```text
//! Idle ──render/navigate──▶ Loading ──commit──▶ Rendered ──▶ ...
//! ```
//!
//! Synchronous (eager) sources skip Loading entirely. While a load is
//! in flight, navigation attempts are ignored, not queued; the fetched
//! page is committed back on the authoritative context through the
//! scheduler, never from the fetch's own execution context.
//!
//! # Example
//!
//! ```ignore
//! use menukit::{PageSource, Paginator, PaginatorConfig};
//!
//! let pager = Paginator::new(surface, scheduler, PaginatorConfig {
//!     cells: (9..36).collect(),
//!     source: PageSource::Eager(quests),
//!     render_item: Arc::new(|quest: &Quest| quest.icon.clone()),
//!     on_item_click: Some(Arc::new(|ctx, quest| {
//!         ctx.cancel();
//!         // open quest details...
//!     })),
//!     ..PaginatorConfig::default()
//! })?;
//! pager.render(&user);
//! ```

use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::click::ClickContext;
use crate::content::Content;
use crate::error::{ConfigError, FetchError};
use crate::host::Host;
use crate::scheduler::Scheduler;
use crate::surface::Surface;
use crate::types::Notice;

/// Notice shown when an asynchronous page load fails.
pub const FETCH_FAILED_MESSAGE: &str = "Couldn't load that page, try again.";

// =============================================================================
// Page sources
// =============================================================================

/// Asynchronous page fetch: page index in, items for that page out.
pub type FetchFn<T> =
    Arc<dyn Fn(usize) -> BoxFuture<'static, Result<Vec<T>, FetchError>> + Send + Sync>;

/// Where page items come from.
pub enum PageSource<T> {
    /// Fully materialized ordered dataset, sliced synchronously.
    Eager(Vec<T>),
    /// Fetched page by page. The page count cannot be derived from the
    /// dataset, so it must be declared explicitly - declaring zero
    /// pages is a configuration error, not a silent "1".
    Remote {
        fetch: FetchFn<T>,
        total_pages: usize,
    },
}

// =============================================================================
// Configuration
// =============================================================================

/// A previous/next navigation control.
pub struct NavButton<C: Content> {
    /// Cell the button lives in.
    pub cell: usize,
    /// Content shown while the direction is available.
    pub active: C,
    /// Content shown while unavailable; `None` clears the cell instead.
    pub disabled: Option<C>,
}

/// Optional page-position display ("page 2 of 5").
pub struct PageInfo<C: Content> {
    pub cell: usize,
    /// Renders `(current_page, total_pages)`; `current_page` is 0-based.
    pub render: Arc<dyn Fn(usize, usize) -> C + Send + Sync>,
}

/// Construct-then-freeze paginator configuration.
///
/// Only `cells`, `source` and `render_item` are required in spirit;
/// everything else defaults to off.
pub struct PaginatorConfig<H: Host, T> {
    /// Designated content cells, in placement order.
    pub cells: Vec<usize>,
    pub source: PageSource<T>,
    /// Renders one item into cell content.
    pub render_item: Arc<dyn Fn(&T) -> H::Content + Send + Sync>,
    /// Click handler bound to the underlying data item, not the cell.
    pub on_item_click: Option<Arc<dyn Fn(&mut ClickContext<'_, H>, &T) + Send + Sync>>,
    /// Transient placeholder painted into every content cell while an
    /// asynchronous load is in flight.
    pub loading_content: Option<H::Content>,
    pub previous: Option<NavButton<H::Content>>,
    pub next: Option<NavButton<H::Content>>,
    pub page_info: Option<PageInfo<H::Content>>,
    /// Invoked with `(new_page, user)` after a successful navigation.
    pub on_page_change: Option<Arc<dyn Fn(usize, &H::User) + Send + Sync>>,
}

// =============================================================================
// Paginator
// =============================================================================

struct PageState {
    current: usize,
    total: usize,
    loading: bool,
}

struct PagInner<H: Host, T> {
    surface: Surface<H>,
    scheduler: Arc<dyn Scheduler>,
    cells: Vec<usize>,
    source: PageSource<T>,
    render_item: Arc<dyn Fn(&T) -> H::Content + Send + Sync>,
    on_item_click: Option<Arc<dyn Fn(&mut ClickContext<'_, H>, &T) + Send + Sync>>,
    loading_content: Option<H::Content>,
    previous: Option<NavButton<H::Content>>,
    next: Option<NavButton<H::Content>>,
    page_info: Option<PageInfo<H::Content>>,
    on_page_change: Option<Arc<dyn Fn(usize, &H::User) + Send + Sync>>,
    state: Mutex<PageState>,
}

#[derive(Clone, Copy)]
enum NavDirection {
    Previous,
    Next,
}

/// Pagination state machine bound to one surface.
///
/// Cheap-clone handle; navigation button handlers hold weak references,
/// so dropping the last handle defuses them.
pub struct Paginator<H: Host, T: Clone + Send + Sync + 'static> {
    inner: Arc<PagInner<H, T>>,
}

impl<H: Host, T: Clone + Send + Sync + 'static> Clone for Paginator<H, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host, T: Clone + Send + Sync + 'static> Paginator<H, T> {
    /// Validate and freeze a configuration.
    ///
    /// For an eager source the page count is `ceil(len / cells)`, with
    /// a minimum of one page even for an empty dataset. A remote source
    /// must declare its page count explicitly.
    pub fn new(
        surface: Surface<H>,
        scheduler: Arc<dyn Scheduler>,
        config: PaginatorConfig<H, T>,
    ) -> Result<Self, ConfigError> {
        if config.cells.is_empty() {
            return Err(ConfigError::NoContentCells);
        }
        let total = match &config.source {
            PageSource::Eager(items) => items.len().div_ceil(config.cells.len()).max(1),
            PageSource::Remote { total_pages, .. } => {
                if *total_pages == 0 {
                    return Err(ConfigError::UnknownPageCount);
                }
                *total_pages
            }
        };
        Ok(Self {
            inner: Arc::new(PagInner {
                surface,
                scheduler,
                cells: config.cells,
                source: config.source,
                render_item: config.render_item,
                on_item_click: config.on_item_click,
                loading_content: config.loading_content,
                previous: config.previous,
                next: config.next,
                page_info: config.page_info,
                on_page_change: config.on_page_change,
                state: Mutex::new(PageState {
                    current: 0,
                    total,
                    loading: false,
                }),
            }),
        })
    }

    /// 0-based current page.
    pub fn current_page(&self) -> usize {
        self.inner.state.lock().current
    }

    pub fn total_pages(&self) -> usize {
        self.inner.state.lock().total
    }

    /// True for the entire span between a page request being issued and
    /// its content being committed.
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().loading
    }

    /// Render the current page for `user`.
    ///
    /// Synchronous sources slice and render immediately; remote sources
    /// paint the loading placeholder, issue the fetch, and commit on the
    /// scheduler's context. Ignored while a load is already in flight.
    pub fn render(&self, user: &H::User) {
        Self::refresh_page(&self.inner, user);
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Advance one page. No-op on the last page or while loading.
    pub fn next_page(&self, user: &H::User) {
        let target = self.inner.state.lock().current + 1;
        Self::go(&self.inner, user, target);
    }

    /// Go back one page. No-op on page 0 or while loading.
    pub fn previous_page(&self, user: &H::User) {
        let Some(target) = self.inner.state.lock().current.checked_sub(1) else {
            return;
        };
        Self::go(&self.inner, user, target);
    }

    /// Jump to an arbitrary page. No-op when out of bounds or loading.
    pub fn go_to_page(&self, user: &H::User, page: usize) {
        Self::go(&self.inner, user, page);
    }

    fn go(inner: &Arc<PagInner<H, T>>, user: &H::User, page: usize) {
        {
            let mut state = inner.state.lock();
            if state.loading || page >= state.total {
                return;
            }
            state.current = page;
        }
        debug!(surface = %inner.surface.id(), page, "page change");
        Self::refresh_page(inner, user);
        if let Some(hook) = &inner.on_page_change {
            hook(page, user);
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    fn refresh_page(inner: &Arc<PagInner<H, T>>, user: &H::User) {
        match &inner.source {
            PageSource::Eager(items) => {
                let page = inner.state.lock().current;
                let per_page = inner.cells.len();
                let start = (page * per_page).min(items.len());
                let end = (start + per_page).min(items.len());
                let slice = items[start..end].to_vec();
                Self::render_slice(inner, user, &slice);
            }
            PageSource::Remote { fetch, .. } => {
                let page = {
                    let mut state = inner.state.lock();
                    if state.loading {
                        return;
                    }
                    state.loading = true;
                    state.current
                };

                // Transient placeholder while the fetch is out.
                for &cell in &inner.cells {
                    inner.surface.reset_slot(cell);
                    if let Some(placeholder) = &inner.loading_content {
                        inner.surface.set_content(cell, Some(placeholder.clone()));
                    }
                }

                let fut = fetch(page);
                let scheduler = inner.scheduler.clone();
                let weak = Arc::downgrade(inner);
                let user = user.clone();
                inner.scheduler.spawn(Box::pin(async move {
                    let result = fut.await;
                    // Re-enter the authoritative context before touching
                    // any surface state.
                    scheduler.later(
                        0,
                        Box::new(move || {
                            let Some(inner) = weak.upgrade() else { return };
                            Self::commit(&inner, &user, result);
                        }),
                    );
                }));
            }
        }
    }

    /// Land a fetched page on the surface, or recover from a failure.
    fn commit(inner: &Arc<PagInner<H, T>>, user: &H::User, result: Result<Vec<T>, FetchError>) {
        inner.state.lock().loading = false;
        match result {
            Ok(items) => {
                Self::render_slice(inner, user, &items);
            }
            Err(err) => {
                warn!(surface = %inner.surface.id(), %err, "page fetch failed");
                inner
                    .surface
                    .host()
                    .notify(user, &Notice::failure(FETCH_FAILED_MESSAGE));
            }
        }
    }

    fn render_slice(inner: &Arc<PagInner<H, T>>, user: &H::User, items: &[T]) {
        // Content cells: clear previous assignments and handlers, then
        // place up to one item per cell in order.
        for (position, &cell) in inner.cells.iter().enumerate() {
            inner.surface.reset_slot(cell);
            let Some(item) = items.get(position) else {
                continue;
            };
            inner
                .surface
                .set_content(cell, Some((inner.render_item)(item)));
            if let Some(handler) = &inner.on_item_click {
                let handler = handler.clone();
                let item = item.clone();
                inner.surface.with_slot(cell, move |slot| {
                    slot.set_handler(Some(Arc::new(move |ctx: &mut ClickContext<'_, H>| {
                        handler(ctx, &item)
                    })));
                });
            }
        }

        let (current, total) = {
            let state = inner.state.lock();
            (state.current, state.total)
        };

        Self::nav_button(inner, NavDirection::Previous, current > 0);
        Self::nav_button(inner, NavDirection::Next, current + 1 < total);

        if let Some(info) = &inner.page_info {
            inner
                .surface
                .set_content(info.cell, Some((info.render)(current, total)));
        }

        inner.surface.host().refresh(user);
    }

    fn nav_button(inner: &Arc<PagInner<H, T>>, direction: NavDirection, available: bool) {
        let button = match direction {
            NavDirection::Previous => inner.previous.as_ref(),
            NavDirection::Next => inner.next.as_ref(),
        };
        let Some(button) = button else { return };

        inner.surface.reset_slot(button.cell);
        if !available {
            // Distinct disabled visual, or an empty cell when none is
            // configured.
            if let Some(disabled) = &button.disabled {
                inner.surface.set_content(button.cell, Some(disabled.clone()));
            }
            return;
        }

        inner
            .surface
            .set_content(button.cell, Some(button.active.clone()));
        let weak: Weak<PagInner<H, T>> = Arc::downgrade(inner);
        inner.surface.with_slot(button.cell, move |slot| {
            slot.set_handler(Some(Arc::new(move |ctx: &mut ClickContext<'_, H>| {
                ctx.cancel();
                let Some(inner) = weak.upgrade() else { return };
                let user = ctx.user().clone();
                let target = {
                    let state = inner.state.lock();
                    match direction {
                        NavDirection::Previous => state.current.checked_sub(1),
                        NavDirection::Next => Some(state.current + 1),
                    }
                };
                if let Some(page) = target {
                    Self::go(&inner, &user, page);
                }
            })));
        });
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{RawClick, SurfaceManager};
    use crate::scheduler::ManualScheduler;
    use crate::testing::TestHost;
    use crate::types::Click;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        host: Arc<TestHost>,
        surface: Surface<TestHost>,
        scheduler: Arc<ManualScheduler>,
    }

    fn fixture() -> Fixture {
        let host = Arc::new(TestHost::new());
        let surface = Surface::new(host.clone(), "pager", 54).unwrap();
        Fixture {
            host,
            surface,
            scheduler: Arc::new(ManualScheduler::new()),
        }
    }

    fn base_config(source: PageSource<String>) -> PaginatorConfig<TestHost, String> {
        PaginatorConfig {
            cells: (0..9).collect(),
            source,
            render_item: Arc::new(|item: &String| format!("cell:{item}")),
            on_item_click: None,
            loading_content: None,
            previous: None,
            next: None,
            page_info: None,
            on_page_change: None,
        }
    }

    fn items(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("item{i}")).collect()
    }

    fn cell_contents(surface: &Surface<TestHost>, cells: std::ops::Range<usize>) -> Vec<Option<String>> {
        cells.map(|i| surface.content(i)).collect()
    }

    fn ready_fetch(
        pages: Vec<Vec<String>>,
        calls: Arc<AtomicUsize>,
    ) -> FetchFn<String> {
        Arc::new(move |page| {
            calls.fetch_add(1, Ordering::SeqCst);
            let items = pages.get(page).cloned().unwrap_or_default();
            Box::pin(async move { Ok(items) })
        })
    }

    #[test]
    fn test_config_validation() {
        let fx = fixture();
        let mut config = base_config(PageSource::Eager(items(3)));
        config.cells.clear();
        assert_eq!(
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config)
                .err(),
            Some(ConfigError::NoContentCells)
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let config = base_config(PageSource::Remote {
            fetch: ready_fetch(vec![], calls),
            total_pages: 0,
        });
        assert_eq!(
            Paginator::new(fx.surface, fx.scheduler, config).err(),
            Some(ConfigError::UnknownPageCount)
        );
    }

    #[test]
    fn test_eager_slicing_22_items_9_cells() {
        // 22 items over 9 cells: 3 pages; page 0 shows items 0-8,
        // page 2 shows items 18-21 with the remaining cells empty.
        let fx = fixture();
        let pager = Paginator::new(
            fx.surface.clone(),
            fx.scheduler.clone(),
            base_config(PageSource::Eager(items(22))),
        )
        .unwrap();

        assert_eq!(pager.total_pages(), 3);

        pager.render(&"alice");
        let page0 = cell_contents(&fx.surface, 0..9);
        assert_eq!(page0[0], Some("cell:item0".to_string()));
        assert_eq!(page0[8], Some("cell:item8".to_string()));
        assert!(page0.iter().all(Option::is_some));

        pager.go_to_page(&"alice", 2);
        let page2 = cell_contents(&fx.surface, 0..9);
        assert_eq!(page2[0], Some("cell:item18".to_string()));
        assert_eq!(page2[3], Some("cell:item21".to_string()));
        assert!(page2[4..].iter().all(Option::is_none));
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_empty_eager_dataset_has_one_page() {
        let fx = fixture();
        let pager = Paginator::new(
            fx.surface.clone(),
            fx.scheduler.clone(),
            base_config(PageSource::Eager(Vec::new())),
        )
        .unwrap();
        assert_eq!(pager.total_pages(), 1);
        pager.render(&"alice");
        assert!(cell_contents(&fx.surface, 0..9).iter().all(Option::is_none));
    }

    #[test]
    fn test_out_of_bounds_navigation_is_noop() {
        let fx = fixture();
        let pager = Paginator::new(
            fx.surface.clone(),
            fx.scheduler.clone(),
            base_config(PageSource::Eager(items(22))),
        )
        .unwrap();

        pager.go_to_page(&"alice", 3);
        assert_eq!(pager.current_page(), 0);
        pager.go_to_page(&"alice", usize::MAX);
        assert_eq!(pager.current_page(), 0);
        pager.previous_page(&"alice");
        assert_eq!(pager.current_page(), 0);

        pager.go_to_page(&"alice", 2);
        pager.next_page(&"alice");
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_page_change_hook() {
        let fx = fixture();
        let changes = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let log = changes.clone();
        let mut config = base_config(PageSource::Eager(items(22)));
        config.on_page_change = Some(Arc::new(move |page, user: &&'static str| {
            log.lock().push((page, *user));
        }));
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        pager.next_page(&"alice");
        pager.next_page(&"alice");
        pager.next_page(&"alice"); // out of bounds: no hook
        pager.previous_page(&"bob");

        assert_eq!(
            *changes.lock(),
            vec![(1, "alice"), (2, "alice"), (1, "bob")]
        );
    }

    #[test]
    fn test_item_click_bound_to_item() {
        let fx = fixture();
        let clicked = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let log = clicked.clone();
        let mut config = base_config(PageSource::Eager(items(22)));
        config.on_item_click = Some(Arc::new(move |ctx, item: &String| {
            ctx.cancel();
            log.lock().push(item.clone());
        }));
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        let manager = SurfaceManager::new(fx.host.clone());
        manager.open(&"alice", fx.surface.clone());
        pager.go_to_page(&"alice", 1);

        // Cell 4 of page 1 holds item 13.
        let verdict = manager.handle_click(RawClick {
            user: "alice",
            holder: Some(fx.surface.clone()),
            cell: Some(4),
            click: Click::left(),
        });
        assert!(verdict.is_cancelled());
        assert_eq!(*clicked.lock(), vec!["item13".to_string()]);
    }

    #[test]
    fn test_nav_buttons_reflect_bounds() {
        let fx = fixture();
        let mut config = base_config(PageSource::Eager(items(22)));
        config.previous = Some(NavButton {
            cell: 45,
            active: "prev".to_string(),
            disabled: Some("prev-off".to_string()),
        });
        config.next = Some(NavButton {
            cell: 53,
            active: "next".to_string(),
            disabled: None,
        });
        config.page_info = Some(PageInfo {
            cell: 49,
            render: Arc::new(|page, total| format!("{}/{}", page + 1, total)),
        });
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        pager.render(&"alice");
        assert_eq!(fx.surface.content(45), Some("prev-off".to_string()));
        assert_eq!(fx.surface.content(53), Some("next".to_string()));
        assert_eq!(fx.surface.content(49), Some("1/3".to_string()));

        pager.go_to_page(&"alice", 2);
        assert_eq!(fx.surface.content(45), Some("prev".to_string()));
        // No disabled visual configured: the cell is cleared instead.
        assert_eq!(fx.surface.content(53), None);
        assert_eq!(fx.surface.content(49), Some("3/3".to_string()));
    }

    #[test]
    fn test_nav_button_click_navigates() {
        let fx = fixture();
        let mut config = base_config(PageSource::Eager(items(22)));
        config.next = Some(NavButton {
            cell: 53,
            active: "next".to_string(),
            disabled: None,
        });
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        let manager = SurfaceManager::new(fx.host.clone());
        manager.open(&"alice", fx.surface.clone());
        pager.render(&"alice");

        let verdict = manager.handle_click(RawClick {
            user: "alice",
            holder: Some(fx.surface.clone()),
            cell: Some(53),
            click: Click::left(),
        });
        assert!(verdict.is_cancelled());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(fx.surface.content(0), Some("cell:item9".to_string()));
    }

    #[test]
    fn test_remote_load_paints_placeholder_then_commits() {
        let fx = fixture();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut config = base_config(PageSource::Remote {
            fetch: ready_fetch(vec![items(2), vec!["later".to_string()]], calls.clone()),
            total_pages: 2,
        });
        config.loading_content = Some("loading...".to_string());
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        pager.render(&"alice");
        // Fetch issued; commit still queued behind the scheduler.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(pager.is_loading());
        assert_eq!(fx.surface.content(0), Some("loading...".to_string()));
        assert_eq!(fx.surface.content(8), Some("loading...".to_string()));

        fx.scheduler.advance(0);
        assert!(!pager.is_loading());
        assert_eq!(fx.surface.content(0), Some("cell:item0".to_string()));
        assert_eq!(fx.surface.content(1), Some("cell:item1".to_string()));
        assert_eq!(fx.surface.content(2), None);
    }

    #[test]
    fn test_overlapping_requests_ignored() {
        let fx = fixture();
        let calls = Arc::new(AtomicUsize::new(0));
        let config = base_config(PageSource::Remote {
            fetch: ready_fetch(vec![items(1), items(1), items(1)], calls.clone()),
            total_pages: 3,
        });
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        pager.render(&"alice");
        assert!(pager.is_loading());

        // Navigation during the in-flight load is ignored, not queued.
        pager.next_page(&"alice");
        pager.go_to_page(&"alice", 2);
        pager.render(&"alice");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(pager.current_page(), 0);

        fx.scheduler.advance(0);
        assert!(!pager.is_loading());

        // After the commit, navigation works again.
        pager.next_page(&"alice");
        assert_eq!(pager.current_page(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_fetch_recovers() {
        // Scenario: a failed load leaves the page unchanged, clears the
        // loading flag, and issues exactly one failure notice.
        let fx = fixture();
        let fetch: FetchFn<String> = Arc::new(|_| {
            Box::pin(async { Err(FetchError::new("backend down")) })
        });
        let mut config = base_config(PageSource::Remote {
            fetch,
            total_pages: 4,
        });
        config.loading_content = Some("loading...".to_string());
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        pager.render(&"alice");
        fx.scheduler.advance(0);

        assert!(!pager.is_loading());
        assert_eq!(pager.current_page(), 0);
        let notices = fx.host.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, "alice");
        assert_eq!(notices[0].1.message, FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_render_refreshes_viewer() {
        let fx = fixture();
        let pager = Paginator::new(
            fx.surface.clone(),
            fx.scheduler.clone(),
            base_config(PageSource::Eager(items(3))),
        )
        .unwrap();
        pager.render(&"alice");
        assert_eq!(fx.host.refresh_count(), 1);
    }

    #[test]
    fn test_dropped_paginator_defuses_nav_buttons() {
        let fx = fixture();
        let mut config = base_config(PageSource::Eager(items(22)));
        config.next = Some(NavButton {
            cell: 53,
            active: "next".to_string(),
            disabled: None,
        });
        let pager =
            Paginator::new(fx.surface.clone(), fx.scheduler.clone(), config).unwrap();

        let manager = SurfaceManager::new(fx.host.clone());
        manager.open(&"alice", fx.surface.clone());
        pager.render(&"alice");
        drop(pager);

        // The stored handler's weak reference fails to upgrade; the
        // click is still cancelled but navigates nowhere.
        let verdict = manager.handle_click(RawClick {
            user: "alice",
            holder: Some(fx.surface.clone()),
            cell: Some(53),
            click: Click::left(),
        });
        assert!(verdict.is_cancelled());
        assert_eq!(fx.surface.content(0), Some("cell:item0".to_string()));
    }
}
