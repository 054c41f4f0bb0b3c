//! # menukit
//!
//! A UI-construction toolkit for grid-based interactive menus hosted in
//! a server-side container system.
//!
//! Menus are [`Surface`]s: fixed grids of cells holding opaque display
//! payloads, with per-cell click handlers, lifecycle hooks and typed
//! metadata. A [`SurfaceManager`] owns the user-to-surface session map
//! and routes the host's raw events; everything platform-specific goes
//! through the [`Host`] trait, so the core is testable entirely in
//! memory.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use menukit::{Slots, Surface, SurfaceManager};
//!
//! let host = Arc::new(MyHost::new(server));
//! let manager = SurfaceManager::new(host.clone());
//!
//! let menu = Surface::new(host, "Quests", 27)?;
//! menu.all().fill_empty(filler_pane());
//! menu.slot(13).set(Some(quest_icon()));
//! menu.slot(13).on_click(|ctx| {
//!     ctx.cancel();
//!     ctx.close();
//! });
//!
//! manager.open(&player, menu);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! raw host events ──▶ SurfaceManager ──▶ Surface ──▶ slot handlers
//!                          │                │
//!                     session map      Host::write_cell
//!                   (generation tag)
//! ```
//!
//! - [`manager`] - session registry, generation-based stale detection,
//!   raw click/drag/open/close routing.
//! - [`surface`] - the grid itself: slots, handle API, hooks, metadata.
//! - [`animation`] - differential frame and pulse playback on a
//!   [`Scheduler`].
//! - [`pagination`] - dataset slicing with sync and async page sources.
//! - [`host`] / [`scheduler`] - the two platform seams.

pub mod animation;
pub mod click;
pub mod content;
pub mod error;
pub mod host;
pub mod manager;
pub mod pagination;
pub mod scheduler;
pub mod surface;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// ===== PUBLIC API =====

pub use animation::{Animation, Frame, FrameConfig, PulseConfig, RunState};
pub use click::ClickContext;
pub use content::{Content, slots_similar};
pub use error::{ConfigError, FetchError};
pub use host::Host;
pub use manager::{RawClick, Resolution, SurfaceManager, STALE_SURFACE_MESSAGE};
pub use pagination::{
    FetchFn, NavButton, PageInfo, PageSource, Paginator, PaginatorConfig,
    FETCH_FAILED_MESSAGE,
};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle, TokioScheduler};
pub use surface::{
    ClickHandler, LifecycleHandler, MetaValue, MultiHandle, RangeHandle, SlotHandle,
    SlotState, Slots, Surface, DEFAULT_DISABLED_MESSAGE,
};
pub use types::{
    Click, ClickButton, ClickModifiers, Feedback, Generation, Notice, SurfaceId, Verdict,
};
