//! Ordered array fields with stable per-entry identity.

mod backing;
mod controller;
mod drag;
mod ids;

pub use backing::BackingArray;
pub use controller::{
    ArrayEntry, ArrayField, FieldBuilder, FieldRequest, MAX_ID_ATTEMPTS, ReadOnlyFieldBuilder,
};
pub use drag::{
    DEFAULT_HYSTERESIS_PX, DragItem, DragReorder, DropTarget, EntryBounds, HoverOutcome,
};
pub use ids::{EntryId, IdGenerator, IdStrategy, SequenceIdGenerator, UuidIdGenerator};
