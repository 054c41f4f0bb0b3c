//! Error taxonomy.
//!
//! Only genuine misconfiguration is an `Err` here. Recoverable outcomes
//! (stale surfaces, out-of-range cell indices, fetch failures) are
//! modeled as first-class results or permissive no-ops, never as
//! propagated errors.

use thiserror::Error;

/// Construction-time misconfiguration, fatal to the operation that
/// detected it. Never silently defaulted: assuming "1 page" or a
/// one-cell grid would hide real mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A surface was built with a zero-cell grid.
    #[error("surface grid must have at least one cell")]
    EmptyGrid,

    /// An animation was built with a zero-tick interval.
    #[error("animation interval must be at least one tick")]
    ZeroInterval,

    /// A remote page source declared zero pages; the page count must be
    /// supplied explicitly when it cannot be derived from the dataset.
    #[error("remote page source must declare at least one page")]
    UnknownPageCount,

    /// A paginator was built with no content cells to render into.
    #[error("pagination requires at least one content cell")]
    NoContentCells,
}

/// Failure of an asynchronous page fetch.
///
/// Recovered by the pagination engine: the loading flag is cleared, the
/// user is notified, and the current page stays unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page fetch failed: {0}")]
pub struct FetchError(pub String);

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
