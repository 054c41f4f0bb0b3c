//! Differential frame animation.
//!
//! An [`Animation`] plays a sequence of visual states onto a surface,
//! one state per interval, issuing a host write only for cells whose
//! content actually changed since the last applied state ("diff-apply"
//! against the shadow map).
//!
//! # Run-state machine
//!
//! ```text
//! Idle ──start──▶ Running ⇄ Paused        (pause keeps index + shadow)
//!                 Running ──exhausted──▶ Completed   (non-looping)
//!                 Running ──wraps──▶ Running          (looping)
//!                 any ──stop──▶ Idle                 (cleanup, no completion)
//! ```
//!
//! Ticks are cooperative: each tick reschedules itself through the
//! [`Scheduler`] only while still running, and a callback that fires
//! after a concurrent `stop()`/`pause()` detects the state change and
//! does nothing. Dropping the last animation handle orphans any pending
//! callback the same way.
//!
//! # Example
//!
//! ```ignore
//! use menukit::{Animation, Frame, FrameConfig};
//!
//! let anim = Animation::frames(surface, scheduler, FrameConfig {
//!     interval: 5,
//!     looping: true,
//!     frames: vec![
//!         Frame::new().with(4, spinner_1),
//!         Frame::new().with(4, spinner_2),
//!     ],
//! })?;
//! anim.start();
//! ```

mod playback;

pub use playback::Frame;
pub(crate) use playback::Playback;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::warn;

use crate::content::{Content, slots_similar};
use crate::error::ConfigError;
use crate::host::Host;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::surface::Surface;

// =============================================================================
// Run state
// =============================================================================

/// Where an animation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Completed,
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a frame-sequence animation.
pub struct FrameConfig<C: Content> {
    /// Ticks between consecutive frames. Must be at least 1.
    pub interval: u64,
    /// Wrap to frame 0 at the end instead of completing.
    pub looping: bool,
    /// Frames in playback order. May also be appended later while the
    /// animation is not running.
    pub frames: Vec<Frame<C>>,
}

/// Configuration for a pulse (highlight toggle) animation.
pub struct PulseConfig<C: Content> {
    /// Ticks between phase toggles. Must be at least 1.
    pub interval: u64,
    /// Cells to pulse.
    pub cells: Vec<usize>,
    /// Content shown during the highlighted phase; the other phase
    /// restores what was displayed before the animation started.
    pub highlight: C,
}

// =============================================================================
// Animation
// =============================================================================

/// Completion hook, invoked at most once per play-through when a
/// non-looping animation exhausts its frames. Never invoked by `stop()`.
type CompletionHandler = Arc<dyn Fn() + Send + Sync>;

struct AnimInner<H: Host> {
    surface: Surface<H>,
    scheduler: Arc<dyn Scheduler>,
    playback: Playback<H::Content>,
    interval: u64,
    run: RunState,
    current: usize,
    /// What we believe is on screen for every touched cell, used to
    /// compute minimal diffs.
    shadow: HashMap<usize, Option<H::Content>>,
    pending: Option<TaskHandle>,
    on_complete: Option<CompletionHandler>,
}

/// A cooperative, tick-driven animation on one surface.
///
/// Cheap-clone handle. The animation has no registry ownership: when
/// the last handle is dropped, any still-pending tick callback finds
/// nothing to upgrade and fizzles.
pub struct Animation<H: Host> {
    inner: Arc<Mutex<AnimInner<H>>>,
}

impl<H: Host> Clone for Animation<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> Animation<H> {
    /// Build a frame-sequence animation.
    pub fn frames(
        surface: Surface<H>,
        scheduler: Arc<dyn Scheduler>,
        config: FrameConfig<H::Content>,
    ) -> Result<Self, ConfigError> {
        if config.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self::build(
            surface,
            scheduler,
            Playback::Frames {
                frames: config.frames,
                looping: config.looping,
            },
            config.interval,
        ))
    }

    /// Build a pulse animation.
    pub fn pulse(
        surface: Surface<H>,
        scheduler: Arc<dyn Scheduler>,
        config: PulseConfig<H::Content>,
    ) -> Result<Self, ConfigError> {
        if config.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self::build(
            surface,
            scheduler,
            Playback::Pulse {
                cells: config.cells,
                highlight: config.highlight,
                baseline: HashMap::new(),
            },
            config.interval,
        ))
    }

    fn build(
        surface: Surface<H>,
        scheduler: Arc<dyn Scheduler>,
        playback: Playback<H::Content>,
        interval: u64,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AnimInner {
                surface,
                scheduler,
                playback,
                interval,
                run: RunState::Idle,
                current: 0,
                shadow: HashMap::new(),
                pending: None,
                on_complete: None,
            })),
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.inner.lock().run
    }

    /// Position in the frame sequence.
    pub fn current_index(&self) -> usize {
        self.inner.lock().current
    }

    /// Set the completion hook.
    pub fn on_complete(&self, f: impl Fn() + Send + Sync + 'static) {
        self.inner.lock().on_complete = Some(Arc::new(f));
    }

    /// Append a frame. Frames are append-only during authoring and
    /// immutable during playback: appending to a running animation is
    /// ignored.
    pub fn push_frame(&self, frame: Frame<H::Content>) {
        let mut inner = self.inner.lock();
        if inner.run == RunState::Running {
            warn!("frame appended to a running animation; ignored");
            return;
        }
        if let Playback::Frames { frames, .. } = &mut inner.playback {
            frames.push(frame);
        }
    }

    // -------------------------------------------------------------------------
    // Run-state transitions
    // -------------------------------------------------------------------------

    /// Start playback, or resume if paused.
    ///
    /// A fresh start (from Idle or Completed) resets the index, captures
    /// the shadow baseline from what the host currently displays, and
    /// applies frame 0 immediately. Resuming from Paused keeps both the
    /// index and the shadow untouched.
    pub fn start(&self) {
        let mut completion = None;
        {
            let mut inner = self.inner.lock();
            match inner.run {
                RunState::Running => return,
                RunState::Paused => {
                    inner.run = RunState::Running;
                    Self::schedule(&mut inner, Arc::downgrade(&self.inner));
                    return;
                }
                RunState::Idle | RunState::Completed => {
                    if let Some(handle) = inner.pending.take() {
                        handle.cancel();
                    }
                    inner.current = 0;

                    // Diff against reality, not an assumed-empty grid.
                    let size = inner.surface.size();
                    let mut shadow = HashMap::new();
                    for cell in inner.playback.touched() {
                        if cell < size {
                            shadow.insert(cell, inner.surface.displayed(cell));
                        }
                    }
                    inner.shadow = shadow;
                    let baseline = inner.shadow.clone();
                    inner.playback.capture_baseline(&baseline);

                    if inner.playback.frame_count() == Some(0) {
                        inner.run = RunState::Completed;
                        completion = inner.on_complete.clone();
                    } else {
                        Self::apply_frame(&mut inner, 0);
                        let more = inner.playback.frame_count().is_none_or(|count| count > 1)
                            || inner.playback.looping();
                        if more {
                            inner.run = RunState::Running;
                            Self::schedule(&mut inner, Arc::downgrade(&self.inner));
                        } else {
                            inner.run = RunState::Completed;
                            completion = inner.on_complete.clone();
                        }
                    }
                }
            }
        }
        if let Some(hook) = completion {
            hook();
        }
    }

    /// Pause playback, keeping index and shadow state.
    ///
    /// No-op unless running.
    pub fn pause(&self) {
        let mut inner = self.inner.lock();
        if inner.run != RunState::Running {
            return;
        }
        if let Some(handle) = inner.pending.take() {
            handle.cancel();
        }
        inner.run = RunState::Paused;
    }

    /// Stop playback and return to Idle.
    ///
    /// Variant cleanup (pulse reverting its highlight) runs
    /// synchronously before this returns. The completion hook is not
    /// invoked: only natural exhaustion completes an animation.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if inner.run == RunState::Idle {
            return;
        }
        if let Some(handle) = inner.pending.take() {
            handle.cancel();
        }
        if let Some(revert) = inner.playback.cleanup_frame() {
            Self::apply_entries(&mut inner, revert);
        }
        inner.run = RunState::Idle;
        inner.current = 0;
    }

    /// Seek directly to a frame, applying it through the same diff path.
    ///
    /// Run state is unaffected. No-op for an out-of-sequence index.
    pub fn jump(&self, index: usize) {
        let mut inner = self.inner.lock();
        if let Some(count) = inner.playback.frame_count() {
            if index >= count {
                return;
            }
        }
        Self::apply_frame(&mut inner, index);
        inner.current = index;
    }

    // -------------------------------------------------------------------------
    // Ticking
    // -------------------------------------------------------------------------

    fn schedule(inner: &mut AnimInner<H>, weak: Weak<Mutex<AnimInner<H>>>) {
        let interval = inner.interval;
        let handle = inner.scheduler.later(
            interval,
            Box::new(move || {
                if let Some(strong) = weak.upgrade() {
                    Self::tick(&strong);
                }
            }),
        );
        inner.pending = Some(handle);
    }

    fn tick(inner_arc: &Arc<Mutex<AnimInner<H>>>) {
        let mut completion = None;
        {
            let mut inner = inner_arc.lock();
            // A pending callback racing a stop()/pause() lands here.
            if inner.run != RunState::Running {
                return;
            }
            let next = inner.current.wrapping_add(1);
            match inner.playback.frame_count() {
                Some(count) if next >= count => {
                    if inner.playback.looping() {
                        Self::apply_frame(&mut inner, 0);
                        inner.current = 0;
                        Self::schedule(&mut inner, Arc::downgrade(inner_arc));
                    } else {
                        inner.pending = None;
                        inner.run = RunState::Completed;
                        completion = inner.on_complete.clone();
                    }
                }
                _ => {
                    Self::apply_frame(&mut inner, next);
                    inner.current = next;
                    Self::schedule(&mut inner, Arc::downgrade(inner_arc));
                }
            }
        }
        if let Some(hook) = completion {
            hook();
        }
    }

    // -------------------------------------------------------------------------
    // Diff-apply
    // -------------------------------------------------------------------------

    fn apply_frame(inner: &mut AnimInner<H>, index: usize) {
        let entries = inner.playback.frame(index);
        Self::apply_entries(inner, entries);
    }

    /// Write every entry whose content differs from the shadow belief,
    /// and only those.
    fn apply_entries(inner: &mut AnimInner<H>, entries: Vec<(usize, Option<H::Content>)>) {
        let size = inner.surface.size();
        for (cell, content) in entries {
            if cell >= size {
                continue;
            }
            let known = inner.shadow.get(&cell).and_then(|slot| slot.as_ref());
            if slots_similar(known, content.as_ref()) {
                continue;
            }
            inner.surface.set_content(cell, content.clone());
            inner.shadow.insert(cell, content);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
