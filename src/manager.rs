//! Surface manager - session registry and raw event routing.
//!
//! One manager instance owns the mapping from connected users to their
//! currently open surface (at most one per user) and is the single
//! dispatch point for the host's raw input and lifecycle events.
//!
//! Each manager mints a fresh [`Generation`] at construction. Surfaces
//! are tagged with the generation current when they were opened; after
//! the owning plugin is reloaded and a new manager is built, surfaces
//! still held by the host resolve as [`Resolution::Stale`] and are
//! force-closed with a user notice instead of ever reaching their
//! handlers.
//!
//! The session map is the only structure touched from multiple calling
//! contexts concurrently (connect/disconnect races), so it lives in a
//! `DashMap`. Everything else follows the host's cooperative
//! single-context-per-session model.
//!
//! Construct the manager once at process start and pass it by reference
//! to collaborators; there is no global registry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::click::ClickContext;
use crate::host::Host;
use crate::surface::Surface;
use crate::types::{Click, Generation, Notice, Verdict};

/// Notice shown when a stale surface is force-closed.
pub const STALE_SURFACE_MESSAGE: &str = "This menu is out of date, please reopen it.";

// =============================================================================
// Resolution
// =============================================================================

/// Result of resolving a raw container handle back to a surface.
///
/// Stale is a first-class outcome, distinct from "not a managed surface
/// at all": stale surfaces are force-closed with a notice, foreign
/// containers are simply ignored.
#[derive(Debug)]
pub enum Resolution<H: Host> {
    /// A live surface opened under the current generation.
    Active(Surface<H>),
    /// A surface from a superseded manager generation.
    Stale(Surface<H>),
    /// Not a surface this toolkit manages.
    Foreign,
}

// =============================================================================
// Raw events
// =============================================================================

/// A raw click event as delivered by the host.
///
/// `holder` is the surface the host recovered from its container
/// association, or `None` for containers the toolkit does not manage.
/// `cell` is the raw slot index; `None` means the click landed outside
/// the window entirely, and an index at or beyond the grid size means
/// the user's personal inventory area.
pub struct RawClick<H: Host> {
    pub user: H::User,
    pub holder: Option<Surface<H>>,
    pub cell: Option<usize>,
    pub click: Click,
}

// =============================================================================
// Manager
// =============================================================================

/// Process-wide registry of open surfaces plus the raw event router.
pub struct SurfaceManager<H: Host> {
    host: Arc<H>,
    generation: Generation,
    sessions: DashMap<H::User, Surface<H>>,
}

impl<H: Host> SurfaceManager<H> {
    /// Build a manager, minting a fresh generation.
    pub fn new(host: Arc<H>) -> Self {
        let generation = Generation::next();
        debug!(%generation, "surface manager created");
        Self {
            host,
            generation,
            sessions: DashMap::new(),
        }
    }

    /// The generation surfaces opened through this manager are tagged
    /// with.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of users with an open surface.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The surface currently open for `user`, if any.
    pub fn open_surface(&self, user: &H::User) -> Option<Surface<H>> {
        self.sessions.get(user).map(|entry| entry.value().clone())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Open `surface` for `user`.
    ///
    /// Must run on the scheduling context authoritative for `user`.
    /// Registers the session mapping (replacing any previous one - the
    /// host's close event for the old surface fires naturally), stamps
    /// the surface with the current generation, shows it, and invokes
    /// the open hook.
    pub fn open(&self, user: &H::User, surface: Surface<H>) {
        surface.stamp(self.generation);
        self.sessions.insert(user.clone(), surface.clone());
        debug!(user = ?user, surface = %surface.id(), "surface opened");
        self.host
            .show(user, surface.id(), surface.title(), surface.size());
        surface.emit_open(user);
    }

    /// Close the open surface for `user`, if any.
    ///
    /// Removes the mapping, asks the host to close the container and
    /// invokes the close hook exactly once. No-op when nothing is open.
    pub fn close(&self, user: &H::User) {
        let Some((_, surface)) = self.sessions.remove(user) else {
            return;
        };
        debug!(user = ?user, surface = %surface.id(), "surface closed");
        self.host.request_close(user);
        surface.emit_close(user);
    }

    /// Remove the session mapping on disconnect.
    ///
    /// Connection teardown precludes further interaction, so the close
    /// hook is deliberately not invoked.
    pub fn handle_disconnect(&self, user: &H::User) {
        if self.sessions.remove(user).is_some() {
            debug!(user = ?user, "session dropped on disconnect");
        }
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Resolve a raw container handle to a managed surface.
    pub fn resolve(&self, holder: Option<&Surface<H>>) -> Resolution<H> {
        match holder {
            None => Resolution::Foreign,
            Some(surface) => match surface.generation() {
                // Never opened: nothing this manager is responsible for.
                None => Resolution::Foreign,
                Some(generation) if generation == self.generation => {
                    Resolution::Active(surface.clone())
                }
                Some(_) => Resolution::Stale(surface.clone()),
            },
        }
    }

    /// Force-close a stale surface: drop any session entry pointing at
    /// it, close the container and tell the user why. Handlers of stale
    /// surfaces are never invoked, the close hook included.
    fn force_close_stale(&self, user: &H::User, surface: &Surface<H>) {
        warn!(
            user = ?user,
            surface = %surface.id(),
            stale = ?surface.generation(),
            current = %self.generation,
            "stale surface force-closed"
        );
        self.sessions
            .remove_if(user, |_, current| current == surface);
        self.host.request_close(user);
        self.host
            .notify(user, &Notice::failure(STALE_SURFACE_MESSAGE));
    }

    // -------------------------------------------------------------------------
    // Raw event routing
    // -------------------------------------------------------------------------

    /// Route a raw click. Returns the verdict the host must apply to the
    /// underlying event.
    pub fn handle_click(&self, event: RawClick<H>) -> Verdict {
        let surface = match self.resolve(event.holder.as_ref()) {
            Resolution::Foreign => return Verdict::Allow,
            Resolution::Stale(surface) => {
                self.force_close_stale(&event.user, &surface);
                return Verdict::Cancel;
            }
            Resolution::Active(surface) => surface,
        };

        let view_only = surface.view_only();

        // Outside the grid (including outside the window): the user's
        // personal inventory area stays interactive unless view-only.
        let Some(cell) = event.cell.filter(|cell| *cell < surface.size()) else {
            return if view_only { Verdict::Cancel } else { Verdict::Allow };
        };

        // In range: bounds were just checked, so the target exists.
        let Some(target) = surface.click_target(cell) else {
            return Verdict::Allow;
        };

        if !target.enabled {
            self.host.notify(&event.user, &target.rejection);
            return Verdict::Cancel;
        }

        let mut ctx = ClickContext::new(
            self,
            event.user,
            surface.clone(),
            cell,
            target.content,
            event.click,
        );
        if view_only {
            ctx.cancel();
        }
        if let Some(handler) = target.handler {
            handler(&mut ctx);
        }
        if let Some(global) = surface.global_click_handler() {
            global(&mut ctx);
        }

        if ctx.is_cancelled() {
            Verdict::Cancel
        } else {
            Verdict::Allow
        }
    }

    /// Route a raw drag. Drags across managed surfaces are always
    /// cancelled; there is no partial drag support.
    pub fn handle_drag(&self, user: &H::User, holder: Option<&Surface<H>>) -> Verdict {
        match self.resolve(holder) {
            Resolution::Foreign => Verdict::Allow,
            Resolution::Stale(surface) => {
                self.force_close_stale(user, &surface);
                Verdict::Cancel
            }
            Resolution::Active(_) => Verdict::Cancel,
        }
    }

    /// Reconcile the session map with a host-driven open that did not
    /// originate from [`open`](SurfaceManager::open).
    pub fn handle_raw_open(&self, user: &H::User, holder: Option<&Surface<H>>) {
        if let Resolution::Active(surface) = self.resolve(holder) {
            let current = self.open_surface(user);
            if current.as_ref() != Some(&surface) {
                debug!(user = ?user, surface = %surface.id(), "session map reconciled on raw open");
                self.sessions.insert(user.clone(), surface);
            }
        }
    }

    /// Reconcile the session map with a raw close, regardless of cause
    /// (explicit close, user affordance, host-driven).
    ///
    /// Fires the close hook for the closed surface - including a surface
    /// that was superseded by a newer open and whose close event only
    /// now arrived. The per-open guard in the surface keeps the hook to
    /// at most one invocation.
    pub fn handle_raw_close(&self, user: &H::User, holder: Option<&Surface<H>>) {
        let surface = match self.resolve(holder) {
            Resolution::Foreign => return,
            Resolution::Stale(surface) => {
                // Stale handlers never run; just drop the mapping.
                self.sessions
                    .remove_if(user, |_, current| current == &surface);
                return;
            }
            Resolution::Active(surface) => surface,
        };

        match self.open_surface(user) {
            Some(current) if current == surface => {
                self.sessions.remove(user);
                debug!(user = ?user, surface = %surface.id(), "surface closed by host");
                surface.emit_close(user);
            }
            Some(_) => {
                // The close event of a superseded surface arriving after
                // the replacement was opened.
                surface.emit_close(user);
            }
            None => {
                // Mapping already removed by close(); hook already fired.
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
