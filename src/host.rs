//! Host collaborator seam.
//!
//! The core never talks to the real container system directly; it goes
//! through [`Host`], which bundles the container display primitive and
//! the notification collaborator. The host integration implements this
//! once per platform, and tests implement it in memory.
//!
//! The core only decides *which* logical cell content changed and
//! delegates the actual display write here.

use std::fmt;
use std::hash::Hash;

use crate::content::Content;
use crate::types::{Notice, SurfaceId};

/// Platform seam: container display, close affordance and notifications.
///
/// Containers are keyed by [`SurfaceId`]; the host keeps the association
/// between its raw container object and the id it was shown under, and
/// uses it to recover the managing surface when raw events fire.
///
/// All methods are infallible from the core's point of view: a host that
/// cannot perform a write (user vanished mid-tick, say) swallows it.
pub trait Host: Send + Sync + 'static {
    /// Opaque display payload placed in cells.
    type Content: Content;

    /// Session key for a connected user.
    type User: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Display the container for `surface` to `user`.
    ///
    /// `size` is the fixed number of grid cells; `title` is the window
    /// title. Cell contents already written for this surface id must be
    /// visible once shown.
    fn show(&self, user: &Self::User, surface: SurfaceId, title: &str, size: usize);

    /// Write one cell of a container. `None` clears the cell.
    fn write_cell(&self, surface: SurfaceId, index: usize, content: Option<&Self::Content>);

    /// Read what is currently displayed in one cell.
    ///
    /// Used to capture a diff baseline against reality rather than an
    /// assumed-empty grid.
    fn read_cell(&self, surface: SurfaceId, index: usize) -> Option<Self::Content>;

    /// Ask the host to re-sync the viewing user's display.
    fn refresh(&self, user: &Self::User);

    /// Ask the host to close whatever container `user` is viewing.
    ///
    /// The host's own close event fires naturally afterwards; the
    /// manager reconciles its session map when it arrives.
    fn request_close(&self, user: &Self::User);

    /// Fire-and-forget user feedback (message plus sound category).
    fn notify(&self, user: &Self::User, notice: &Notice);
}
