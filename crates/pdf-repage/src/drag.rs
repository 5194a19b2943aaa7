//! Pointer-driven reordering of the selected pages
//!
//! The engine is fed raw press/move/release events together with the
//! current thumbnail grid geometry. It never touches the sequence until the
//! pointer is released over a valid position, and then performs exactly one
//! batch move.

use crate::constants::{AUTOSCROLL_EDGE_PX, AUTOSCROLL_STEP_PX, DRAG_THRESHOLD_PX, GRID_GUTTER_PX};
use crate::selection::SelectionModel;
use crate::sequence::PageSequence;
use crate::types::*;
use std::ops::Range;

/// Pointer location in viewport pixels, y grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Modifier keys held during a press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Add or remove one item (Ctrl/Cmd)
    pub toggle: bool,
    /// Select a span from the anchor (Shift)
    pub range: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        toggle: false,
        range: false,
    };

    pub fn any(self) -> bool {
        self.toggle || self.range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    fn sign(self) -> f32 {
        match self {
            ScrollDirection::Up => -1.0,
            ScrollDirection::Down => 1.0,
        }
    }
}

/// Layout of the scrollable thumbnail grid at the time of an event
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailGrid {
    pub columns: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Content offset scrolled out of view above the viewport
    pub scroll_offset: f32,
    pub item_count: usize,
}

impl ThumbnailGrid {
    /// Number of thumbnail columns that fit a viewport, never less than one
    pub fn columns_for(viewport_width: f32, thumb_width: f32) -> usize {
        let usable = viewport_width - GRID_GUTTER_PX;
        let per_cell = thumb_width + GRID_GUTTER_PX;
        if usable <= 0.0 || per_cell <= 0.0 {
            return 1;
        }
        ((usable / per_cell).floor() as usize).max(1)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.viewport_width
            && point.y < self.viewport_height
    }

    /// Sequence position under the pointer.
    ///
    /// Empty space past the last thumbnail resolves to `item_count`, the
    /// gap after the last page. Anything outside the viewport resolves to
    /// `None`.
    pub fn position_at(&self, point: Point) -> Option<usize> {
        if self.item_count == 0
            || self.cell_width <= 0.0
            || self.cell_height <= 0.0
            || !self.contains(point)
        {
            return None;
        }

        let columns = self.columns.max(1);
        let row = ((point.y + self.scroll_offset) / self.cell_height).floor().max(0.0) as usize;
        let column = ((point.x / self.cell_width).floor().max(0.0) as usize).min(columns - 1);
        Some((row * columns + column).min(self.item_count))
    }

    /// Autoscroll direction for a pointer in the top or bottom edge band
    pub fn autoscroll_at(&self, point: Point) -> Option<ScrollDirection> {
        if point.y < AUTOSCROLL_EDGE_PX {
            Some(ScrollDirection::Up)
        } else if point.y > self.viewport_height - AUTOSCROLL_EDGE_PX {
            Some(ScrollDirection::Down)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed on a selected item, threshold not yet crossed
    Armed { pressed: usize, origin: Point },
    Dragging {
        pressed: usize,
        origin: Point,
        target: Option<usize>,
        autoscroll: Option<ScrollDirection>,
    },
}

/// What a pointer move changed, for redrawing the drop indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragFeedback {
    /// The threshold was crossed on this move
    pub started: bool,
    pub target: Option<usize>,
    pub target_changed: bool,
    pub autoscroll: Option<ScrollDirection>,
    pub autoscroll_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The selection was moved and now occupies `range`
    Moved { range: Range<usize> },
    /// Press and release without dragging; selection reduced to one item
    Collapsed { position: usize },
    /// The drag ended without a valid drop
    Cancelled,
    /// No press was being tracked
    NoDrag,
}

#[derive(Debug, Clone, Default)]
pub struct DragReorderEngine {
    state: DragState,
}

impl DragReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Current drop target while dragging
    pub fn target(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { target, .. } => target,
            _ => None,
        }
    }

    /// Handle a press on the thumbnail at `position`.
    ///
    /// A plain press on an already selected item arms a drag and leaves the
    /// selection alone. Any other press updates the selection immediately.
    pub fn on_press(
        &mut self,
        position: usize,
        point: Point,
        modifiers: Modifiers,
        selection: &mut SelectionModel,
    ) -> Result<()> {
        self.state = DragState::Idle;

        if !modifiers.any() && selection.contains(position) {
            self.state = DragState::Armed {
                pressed: position,
                origin: point,
            };
            return Ok(());
        }

        if modifiers.range {
            selection.extend_range(position, modifiers.toggle)
        } else if modifiers.toggle {
            selection.toggle(position).map(|_| ())
        } else {
            selection.select_single(position)
        }
    }

    pub fn on_move(&mut self, point: Point, grid: &ThumbnailGrid) -> DragFeedback {
        let mut feedback = DragFeedback::default();

        let (pressed, origin, previous_target, previous_scroll) = match self.state {
            DragState::Idle => return feedback,
            DragState::Armed { pressed, origin } => {
                let dx = (point.x - origin.x).abs();
                let dy = (point.y - origin.y).abs();
                if dx <= DRAG_THRESHOLD_PX && dy <= DRAG_THRESHOLD_PX {
                    return feedback;
                }
                log::debug!("Drag started from position {}", pressed);
                feedback.started = true;
                (pressed, origin, None, None)
            }
            DragState::Dragging {
                pressed,
                origin,
                target,
                autoscroll,
            } => (pressed, origin, target, autoscroll),
        };

        let target = grid.position_at(point);
        let autoscroll = grid.autoscroll_at(point);
        feedback.target = target;
        feedback.target_changed = target != previous_target;
        feedback.autoscroll = autoscroll;
        feedback.autoscroll_changed = autoscroll != previous_scroll;

        self.state = DragState::Dragging {
            pressed,
            origin,
            target,
            autoscroll,
        };
        feedback
    }

    /// Signed scroll delta for one autoscroll tick, zero when disengaged
    pub fn autoscroll_step(&self) -> f32 {
        match self.state {
            DragState::Dragging {
                autoscroll: Some(direction),
                ..
            } => direction.sign() * AUTOSCROLL_STEP_PX,
            _ => 0.0,
        }
    }

    /// Finish the gesture. The engine is always idle afterwards.
    pub fn on_release(
        &mut self,
        point: Point,
        grid: &ThumbnailGrid,
        sequence: &mut PageSequence,
        selection: &mut SelectionModel,
    ) -> Result<DragOutcome> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => Ok(DragOutcome::NoDrag),
            DragState::Armed { pressed, .. } => {
                selection.select_single(pressed)?;
                Ok(DragOutcome::Collapsed { position: pressed })
            }
            DragState::Dragging { .. } => {
                let Some(target) = grid.position_at(point) else {
                    return Ok(DragOutcome::Cancelled);
                };
                if sequence.is_empty() || selection.is_empty() || target > sequence.len() {
                    return Ok(DragOutcome::Cancelled);
                }

                let range = sequence.move_batch(selection.positions(), target)?;
                selection.select_range(range.clone())?;
                Ok(DragOutcome::Moved { range })
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
