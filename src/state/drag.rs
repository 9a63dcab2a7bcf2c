/// Drag-and-drop reordering
///
/// Translates tile gestures into moves on the selection:
/// Idle -> Dragging (drag start) -> Idle (drop or drag end).

use super::selection::Selection;

/// Gesture state for reordering tiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderController {
    /// Index of the tile being dragged, if any
    dragging: Option<usize>,
    /// Tile currently under the pointer while dragging (highlight only)
    hover: Option<usize>,
}

impl ReorderController {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_drag_start(&mut self, index: usize) {
        if let Some(previous) = self.dragging {
            // Host should have sent drag end first; start over from the new tile
            log::debug!("drag start at {index} while {previous} was still dragging");
        }
        self.dragging = Some(index);
        self.hover = None;
    }

    /// Record the hovered drop target. Every target is accepted.
    pub fn on_drag_over(&mut self, target: usize) -> bool {
        if self.dragging.is_none() {
            return false;
        }
        self.hover = Some(target);
        true
    }

    pub fn on_drag_leave(&mut self, target: usize) {
        if self.hover == Some(target) {
            self.hover = None;
        }
    }

    /// Move the dragged tile onto `target`. Returns `true` if the order changed.
    ///
    /// The drag state is taken out before the move, so it is clear afterwards
    /// whatever the move does.
    pub fn on_drop(&mut self, selection: &mut Selection, target: usize) -> bool {
        self.hover = None;
        let Some(from) = self.dragging.take() else {
            return false;
        };

        let moved = selection.move_image(from, target);
        if moved {
            log::debug!("moved image {from} -> {target}");
        }
        moved
    }

    pub fn on_drag_end(&mut self) {
        self.dragging = None;
        self.hover = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn is_source(&self, index: usize) -> bool {
        self.dragging == Some(index)
    }

    /// Hovered drop target, excluding the source tile itself
    pub fn is_target(&self, index: usize) -> bool {
        self.hover == Some(index) && !self.is_source(index)
    }
}
