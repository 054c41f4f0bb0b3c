//! Core types for menukit.
//!
//! These types define the foundation that everything builds on.
//! They flow through the event routing pipeline and define what the
//! host integration understands.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

// =============================================================================
// Identity
// =============================================================================

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a surface, stable for the surface's lifetime.
///
/// Minted from a process-wide counter so two surfaces never collide,
/// even across managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Mint a fresh surface id.
    pub(crate) fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Identifier distinguishing one lifetime of a [`SurfaceManager`] from a
/// prior one (e.g. across a host reload of the owning plugin).
///
/// Every surface is tagged with the generation that was current when it
/// was opened. A surface whose tag no longer matches the manager's
/// generation is stale and must never have its handlers invoked.
///
/// [`SurfaceManager`]: crate::manager::SurfaceManager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Mint a fresh generation. Called once per manager construction.
    pub(crate) fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

// =============================================================================
// Click classification
// =============================================================================

/// Which physical input triggered a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickButton {
    Left,
    Right,
    Middle,
    /// A hotbar number key (0-based index).
    NumberKey(u8),
    /// The drop key while hovering a cell.
    Drop,
    /// Anything the host could not classify further.
    Unknown,
}

bitflags! {
    /// Modifier state attached to a click.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClickModifiers: u8 {
        const SHIFT = 1;
        const DOUBLE = 1 << 1;
    }
}

/// Classified click: button plus modifier state.
///
/// Constructed by the host integration when translating raw events and
/// handed to click handlers through the click context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub button: ClickButton,
    pub modifiers: ClickModifiers,
}

impl Click {
    /// A click with no modifiers.
    pub const fn new(button: ClickButton) -> Self {
        Self {
            button,
            modifiers: ClickModifiers::empty(),
        }
    }

    /// Plain left click.
    pub const fn left() -> Self {
        Self::new(ClickButton::Left)
    }

    /// Plain right click.
    pub const fn right() -> Self {
        Self::new(ClickButton::Right)
    }

    /// Middle (wheel) click.
    pub const fn middle() -> Self {
        Self::new(ClickButton::Middle)
    }

    /// Shift + left click.
    pub const fn shift_left() -> Self {
        Self {
            button: ClickButton::Left,
            modifiers: ClickModifiers::SHIFT,
        }
    }

    /// Shift + right click.
    pub const fn shift_right() -> Self {
        Self {
            button: ClickButton::Right,
            modifiers: ClickModifiers::SHIFT,
        }
    }

    /// Double left click.
    pub const fn double_left() -> Self {
        Self {
            button: ClickButton::Left,
            modifiers: ClickModifiers::DOUBLE,
        }
    }

    /// Hotbar number key press (0-based).
    pub const fn number_key(key: u8) -> Self {
        Self::new(ClickButton::NumberKey(key))
    }

    /// True for any left click, shifted or not.
    pub fn is_left(&self) -> bool {
        matches!(self.button, ClickButton::Left)
    }

    /// True for any right click, shifted or not.
    pub fn is_right(&self) -> bool {
        matches!(self.button, ClickButton::Right)
    }

    /// True for a middle click.
    pub fn is_middle(&self) -> bool {
        matches!(self.button, ClickButton::Middle)
    }

    /// True when shift was held.
    pub fn is_shift(&self) -> bool {
        self.modifiers.contains(ClickModifiers::SHIFT)
    }

    /// True for a double click.
    pub fn is_double(&self) -> bool {
        self.modifiers.contains(ClickModifiers::DOUBLE)
    }

    /// The hotbar key index, if this click was a number key press.
    pub fn number(&self) -> Option<u8> {
        match self.button {
            ClickButton::NumberKey(key) => Some(key),
            _ => None,
        }
    }
}

// =============================================================================
// Event verdict
// =============================================================================

/// Outcome of routing a raw host event.
///
/// The host applies the verdict to the underlying event: [`Verdict::Cancel`]
/// suppresses the default item-movement behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the host's default behavior proceed.
    Allow,
    /// Cancel the raw event.
    Cancel,
}

impl Verdict {
    /// True if the event was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Verdict::Cancel)
    }
}

// =============================================================================
// User-visible feedback
// =============================================================================

/// Auditory/visual feedback category accompanying a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Click,
    Success,
    Failure,
}

/// Short user-visible message plus feedback category.
///
/// Produced by the core on rejected clicks, stale-surface closure and
/// pagination failures; consumed by the host's notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub feedback: Feedback,
}

impl Notice {
    pub fn new(message: impl Into<String>, feedback: Feedback) -> Self {
        Self {
            message: message.into(),
            feedback,
        }
    }

    /// A failure notice.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, Feedback::Failure)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_ids_unique() {
        let a = SurfaceId::next();
        let b = SurfaceId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generations_unique() {
        let a = Generation::next();
        let b = Generation::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_click_predicates() {
        assert!(Click::left().is_left());
        assert!(!Click::left().is_shift());
        assert!(Click::shift_left().is_left());
        assert!(Click::shift_left().is_shift());
        assert!(Click::shift_right().is_right());
        assert!(Click::middle().is_middle());
        assert!(Click::double_left().is_double());
        assert!(Click::double_left().is_left());
        assert_eq!(Click::number_key(3).number(), Some(3));
        assert_eq!(Click::left().number(), None);
    }

    #[test]
    fn test_verdict() {
        assert!(Verdict::Cancel.is_cancelled());
        assert!(!Verdict::Allow.is_cancelled());
    }
}
