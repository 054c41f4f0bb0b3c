//! In-memory host for tests.
//!
//! [`TestHost`] records every call the core makes against the host
//! trait: displayed containers, cell writes, refreshes, close requests
//! and notices. Cell state is a plain map keyed by surface id, so tests
//! can both inspect what the core wrote and seed "reality" directly
//! with [`put_cell`](TestHost::put_cell) without disturbing the write
//! counter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::host::Host;
use crate::types::{Notice, SurfaceId};

/// Recording host backed by in-memory cell state.
#[derive(Default)]
pub(crate) struct TestHost {
    cells: Mutex<HashMap<(SurfaceId, usize), String>>,
    shown: Mutex<Vec<(&'static str, SurfaceId)>>,
    notices: Mutex<Vec<(&'static str, Notice)>>,
    writes: AtomicUsize,
    refreshes: AtomicUsize,
    close_requests: AtomicUsize,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current content of one cell.
    pub(crate) fn cell(&self, surface: SurfaceId, index: usize) -> Option<String> {
        self.cells.lock().get(&(surface, index)).cloned()
    }

    /// Seed cell state directly, bypassing the write counter. Stands in
    /// for content that reached the container without going through the
    /// toolkit.
    pub(crate) fn put_cell(&self, surface: SurfaceId, index: usize, content: String) {
        self.cells.lock().insert((surface, index), content);
    }

    /// Number of `write_cell` calls the core has made.
    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub(crate) fn close_requests(&self) -> usize {
        self.close_requests.load(Ordering::SeqCst)
    }

    /// `(user, surface)` pairs in show order.
    pub(crate) fn shown(&self) -> Vec<(&'static str, SurfaceId)> {
        self.shown.lock().clone()
    }

    /// `(user, notice)` pairs in delivery order.
    pub(crate) fn notices(&self) -> Vec<(&'static str, Notice)> {
        self.notices.lock().clone()
    }
}

impl Host for TestHost {
    type Content = String;
    type User = &'static str;

    fn show(&self, user: &Self::User, surface: SurfaceId, _title: &str, _size: usize) {
        self.shown.lock().push((user, surface));
    }

    fn write_cell(&self, surface: SurfaceId, index: usize, content: Option<&Self::Content>) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut cells = self.cells.lock();
        match content {
            Some(content) => {
                cells.insert((surface, index), content.clone());
            }
            None => {
                cells.remove(&(surface, index));
            }
        }
    }

    fn read_cell(&self, surface: SurfaceId, index: usize) -> Option<Self::Content> {
        self.cells.lock().get(&(surface, index)).cloned()
    }

    fn refresh(&self, _user: &Self::User) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn request_close(&self, _user: &Self::User) {
        self.close_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn notify(&self, user: &Self::User, notice: &Notice) {
        self.notices.lock().push((user, notice.clone()));
    }
}
