//! Drag-to-reorder for array fields.
//!
//! A dragged entry swaps with the entry under the pointer once the pointer
//! has crossed the target's vertical midpoint, widened by a hysteresis band
//! so the two entries don't flip back and forth around the midpoint.

use serde::{Deserialize, Serialize};

use super::backing::BackingArray;
use super::controller::ArrayField;
use super::ids::{EntryId, IdGenerator};
use crate::errors::ArrayFieldError;

pub const DEFAULT_HYSTERESIS_PX: f64 = 50.0;

/// Vertical extent of a drop target on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryBounds {
    pub top: f64,
    pub bottom: f64,
}

impl EntryBounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Midpoint relative to `top`.
    pub fn middle(&self) -> f64 {
        (self.bottom - self.top) / 2.0
    }
}

/// The entry being dragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragItem {
    pub type_tag: String,
    pub id: EntryId,
    /// Current position; updated as the item moves
    pub index: usize,
}

/// The entry under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTarget {
    pub type_tag: String,
    pub index: usize,
    pub bounds: EntryBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverOutcome {
    /// The item belongs to a different field
    Rejected,
    /// Hovering over itself
    SameEntry,
    /// Pointer hasn't crossed the midpoint band yet
    Deferred,
    Moved { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragReorder {
    hysteresis: f64,
}

impl Default for DragReorder {
    fn default() -> Self {
        Self {
            hysteresis: DEFAULT_HYSTERESIS_PX,
        }
    }
}

impl DragReorder {
    pub fn new(hysteresis: f64) -> Self {
        Self { hysteresis }
    }

    pub fn hysteresis(&self) -> f64 {
        self.hysteresis
    }

    /// Whether a drag from `from` onto `to` should move at `pointer_y`.
    pub fn should_move(&self, from: usize, to: usize, bounds: EntryBounds, pointer_y: f64) -> bool {
        if from == to {
            return false;
        }
        let middle = bounds.middle();
        let y = pointer_y - bounds.top;
        if from < to && y < middle - self.hysteresis {
            return false;
        }
        if from > to && y > middle + self.hysteresis {
            return false;
        }
        true
    }

    /// Handle a hover event, moving the entry when the pointer crossed far
    /// enough into the target.
    pub fn hover<G, B>(
        &self,
        field: &mut ArrayField<G>,
        backing: &mut B,
        item: &mut DragItem,
        target: &DropTarget,
        pointer_y: f64,
    ) -> Result<HoverOutcome, ArrayFieldError>
    where
        G: IdGenerator,
        B: BackingArray + ?Sized,
    {
        if item.type_tag != target.type_tag || item.type_tag != field.type_tag() {
            return Ok(HoverOutcome::Rejected);
        }
        let (from, to) = (item.index, target.index);
        if from == to {
            return Ok(HoverOutcome::SameEntry);
        }
        if !self.should_move(from, to, target.bounds, pointer_y) {
            return Ok(HoverOutcome::Deferred);
        }
        field.move_entry(backing, from, to)?;
        item.index = to;
        Ok(HoverOutcome::Moved { from, to })
    }
}

impl<G: IdGenerator> ArrayField<G> {
    /// Start dragging the entry at `position`.
    pub fn drag_item(&self, position: usize) -> Option<DragItem> {
        self.ids().get(position).map(|id| DragItem {
            type_tag: self.type_tag(),
            id: *id,
            index: position,
        })
    }

    pub fn drop_target(&self, position: usize, bounds: EntryBounds) -> DropTarget {
        DropTarget {
            type_tag: self.type_tag(),
            index: position,
            bounds,
        }
    }
}
