//! Playback variants - what an animation shows each tick.
//!
//! Animations are a tagged variant driven by one shared scheduler
//! routine (see the module root): the variant only computes the visual
//! state for a given tick, the shared routine owns run-state, diffing
//! and scheduling.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::content::Content;

// =============================================================================
// Frame
// =============================================================================

/// One named snapshot of cell -> content assignments.
///
/// `None` content means "this frame empties the cell"; cells a frame
/// does not mention are left untouched by that frame.
#[derive(Debug, Clone)]
pub struct Frame<C: Content> {
    cells: BTreeMap<usize, Option<C>>,
}

impl<C: Content> Frame<C> {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Builder-style: assign `content` to `index`.
    pub fn with(mut self, index: usize, content: C) -> Self {
        self.cells.insert(index, Some(content));
        self
    }

    /// Builder-style: this frame empties `index`.
    pub fn with_empty(mut self, index: usize) -> Self {
        self.cells.insert(index, None);
        self
    }

    pub fn set(&mut self, index: usize, content: Option<C>) {
        self.cells.insert(index, content);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell assignments in ascending cell order.
    pub(crate) fn entries(&self) -> Vec<(usize, Option<C>)> {
        self.cells
            .iter()
            .map(|(index, content)| (*index, content.clone()))
            .collect()
    }

    pub(crate) fn touched(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.keys().copied()
    }
}

impl<C: Content> Default for Frame<C> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Tagged playback variant.
pub(crate) enum Playback<C: Content> {
    /// Explicit frame sequence, optionally wrapping at the end.
    Frames {
        frames: Vec<Frame<C>>,
        looping: bool,
    },
    /// Binary highlight toggle on a fixed set of cells. Never completes
    /// on its own; `baseline` is captured from reality at start so stop
    /// can revert.
    Pulse {
        cells: Vec<usize>,
        highlight: C,
        baseline: HashMap<usize, Option<C>>,
    },
}

impl<C: Content> Playback<C> {
    /// Total frame count, or `None` for unbounded playback.
    pub(crate) fn frame_count(&self) -> Option<usize> {
        match self {
            Playback::Frames { frames, .. } => Some(frames.len()),
            Playback::Pulse { .. } => None,
        }
    }

    pub(crate) fn looping(&self) -> bool {
        match self {
            Playback::Frames { looping, .. } => *looping,
            Playback::Pulse { .. } => true,
        }
    }

    /// Every cell any frame touches, deduplicated, ascending.
    pub(crate) fn touched(&self) -> BTreeSet<usize> {
        match self {
            Playback::Frames { frames, .. } => {
                frames.iter().flat_map(|frame| frame.touched()).collect()
            }
            Playback::Pulse { cells, .. } => cells.iter().copied().collect(),
        }
    }

    /// Remember the pre-animation content of the pulsed cells.
    /// No-op for frame playback.
    pub(crate) fn capture_baseline(&mut self, shadow: &HashMap<usize, Option<C>>) {
        if let Playback::Pulse { cells, baseline, .. } = self {
            baseline.clear();
            for cell in cells.iter() {
                if let Some(content) = shadow.get(cell) {
                    baseline.insert(*cell, content.clone());
                }
            }
        }
    }

    /// The visual state for frame `index`.
    ///
    /// For pulse playback, even indices are the highlighted phase and
    /// odd indices the baseline phase, so frame 0 highlights right away.
    pub(crate) fn frame(&self, index: usize) -> Vec<(usize, Option<C>)> {
        match self {
            Playback::Frames { frames, .. } => frames
                .get(index)
                .map(|frame| frame.entries())
                .unwrap_or_default(),
            Playback::Pulse {
                cells,
                highlight,
                baseline,
            } => {
                if index % 2 == 0 {
                    cells
                        .iter()
                        .map(|cell| (*cell, Some(highlight.clone())))
                        .collect()
                } else {
                    cells
                        .iter()
                        .map(|cell| (*cell, baseline.get(cell).cloned().flatten()))
                        .collect()
                }
            }
        }
    }

    /// What to apply synchronously on stop, if anything: pulse actively
    /// reverts the highlight instead of leaving cells mid-toggle.
    pub(crate) fn cleanup_frame(&self) -> Option<Vec<(usize, Option<C>)>> {
        match self {
            Playback::Frames { .. } => None,
            Playback::Pulse { cells, baseline, .. } => Some(
                cells
                    .iter()
                    .map(|cell| (*cell, baseline.get(cell).cloned().flatten()))
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
