//! Drag-and-drop reordering as an explicit state machine.
//!
//! Pointer events are reduced to abstract intents (start, hover a row, hover the empty canvas,
//! leave, drop, cancel) so the controller works the same under any input or rendering layer.
//! Hovering decides a move mode and arms a single drop indicator; dropping commits whatever is
//! armed through the outline's move primitives, re-checking the move against the current tree.

use crate::node::{Depth, NodeId};
use crate::outline::{Outline, Placement};
use tracing::debug;

#[derive(Clone, PartialEq, Eq, Debug)]
/// Tracks whether a section is currently being dragged.
///
/// ```text
/// Idle -> Dragging -> Idle (after drop or cancel)
/// ```
///
/// Only one drag exists at a time. Starting is only possible from `Idle`.
pub enum DragState {
    /// Nothing is being dragged.
    Idle,
    /// A section has been picked up by its handle.
    Dragging {
        /// The section being dragged.
        source: NodeId,
        /// Its depth when the drag started.
        depth: Depth,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// How a drop onto a row would move the dragged section.
pub enum MoveMode {
    /// Reorder to just before the row (same parent, same depth).
    Before,
    /// Reorder to just after the row (same parent, same depth).
    After,
    /// Re-parent as the row's last child (row is one level shallower).
    Into,
}

#[derive(Clone, PartialEq, Eq, Debug)]
/// The armed drop indicator.
pub enum DropTarget {
    /// A row with a valid move mode.
    Row {
        /// The hovered row.
        target: NodeId,
        /// What dropping here would do.
        mode: MoveMode,
    },
    /// The empty area below the tree: append a chapter to the end of the top-level list.
    Canvas,
}

#[derive(Clone, PartialEq, Eq, Debug)]
/// Where the pointer was released.
pub enum DropSite {
    /// On a row.
    Row(NodeId),
    /// On the empty canvas, away from any row.
    Canvas,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Which half of a row the pointer is over.
pub enum RowHalf {
    /// Above the vertical midpoint.
    Upper,
    /// At or below the vertical midpoint.
    Lower,
}

impl RowHalf {
    #[must_use]
    /// Classifies a pointer position against a row's vertical extent.
    pub fn from_pointer(pointer_y: f64, row_top: f64, row_height: f64) -> Self {
        if pointer_y < row_top + row_height / 2.0 {
            Self::Upper
        } else {
            Self::Lower
        }
    }
}

#[derive(Debug)]
/// Holds the single active drag and its drop indicator.
pub struct DragController {
    state: DragState,
    indicator: Option<DropTarget>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    #[must_use]
    /// An idle controller.
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            indicator: None,
        }
    }

    #[must_use]
    /// Current state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    /// The drop indicator currently shown, if any.
    pub fn indicator(&self) -> Option<&DropTarget> {
        self.indicator.as_ref()
    }

    #[must_use]
    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Picks up a section by its handle.
    ///
    /// Fails while another drag is active, for the title, and for unknown ids.
    pub fn start(&mut self, outline: &Outline, id: &NodeId) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(ctx) = outline.context(id) else {
            return false;
        };
        self.state = DragState::Dragging {
            source: id.clone(),
            depth: ctx.node.depth,
        };
        self.indicator = None;
        debug!(%id, "drag started");
        true
    }

    /// Evaluates the pointer hovering over row `target`, arming the indicator when the move is
    /// valid and clearing it when it is not.
    pub fn hover_row(
        &mut self,
        outline: &Outline,
        target: &NodeId,
        half: RowHalf,
    ) -> Option<MoveMode> {
        let DragState::Dragging { source, depth } = &self.state else {
            return None;
        };
        if source == target {
            return None;
        }
        let (Some(src), Some(dst)) = (outline.context(source), outline.context(target)) else {
            return None;
        };

        let mode = if dst.node.depth == *depth && dst.parent_id() == src.parent_id() {
            match half {
                RowHalf::Upper => MoveMode::Before,
                RowHalf::Lower => MoveMode::After,
            }
        } else if depth.parent() == Some(dst.node.depth) {
            MoveMode::Into
        } else {
            self.indicator = None;
            return None;
        };

        self.indicator = Some(DropTarget::Row {
            target: target.clone(),
            mode,
        });
        Some(mode)
    }

    /// Arms the canvas target. Only chapters may be dropped there.
    pub fn hover_canvas(&mut self) -> bool {
        match self.state {
            DragState::Dragging {
                depth: Depth::One, ..
            } => {
                self.indicator = Some(DropTarget::Canvas);
                true
            }
            _ => false,
        }
    }

    /// The pointer left row `target`; clears the indicator if it was on that row.
    pub fn leave_row(&mut self, target: &NodeId) {
        if matches!(&self.indicator, Some(DropTarget::Row { target: t, .. }) if t == target) {
            self.indicator = None;
        }
    }

    /// The pointer left the canvas.
    pub fn leave_canvas(&mut self) {
        if self.indicator == Some(DropTarget::Canvas) {
            self.indicator = None;
        }
    }

    /// Releases the drag at `site`, committing the armed move if it matches.
    ///
    /// Always returns to `Idle`. Returns whether the outline changed; any mismatch between the
    /// armed indicator, the drop site and the current tree is a silent no-op.
    pub fn drop_at(&mut self, outline: &mut Outline, site: &DropSite) -> bool {
        let indicator = self.indicator.take();
        let DragState::Dragging { source, .. } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return false;
        };

        let committed = match (site, indicator) {
            (DropSite::Row(row), Some(DropTarget::Row { target, mode })) if *row == target => {
                match mode {
                    MoveMode::Before => outline.move_beside(&source, &target, Placement::Before),
                    MoveMode::After => outline.move_beside(&source, &target, Placement::After),
                    MoveMode::Into => outline.move_into(&source, &target),
                }
            }
            (DropSite::Canvas, Some(DropTarget::Canvas)) => outline.move_to_end(&source),
            _ => false,
        };
        debug!(%source, committed, "drag dropped");
        committed
    }

    /// Abandons the drag without touching the outline.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
        self.indicator = None;
    }
}

#[cfg(test)]
#[path = "tests/drag.rs"]
mod tests;
