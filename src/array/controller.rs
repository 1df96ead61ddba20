//! Ordered array field controller.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use super::backing::BackingArray;
use super::ids::{EntryId, IdGenerator, SequenceIdGenerator};
use crate::errors::{ArrayFieldError, SchemaError};
use crate::preview::{self, PreviewContext, RenderedOutput};
use crate::schema::{Property, PropertyKind};
use crate::value::Value;

/// One entry of an array field as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayEntry<'a> {
    pub id: EntryId,
    /// Derived from the entry's index, never stored
    pub position: usize,
    pub content: Option<&'a Value>,
}

/// Inputs for rendering one non-reference array entry.
#[derive(Debug, Clone, Copy)]
pub struct FieldRequest<'a> {
    /// Form path of the entry, e.g. `authors[2]`
    pub name: &'a str,
    pub entry_id: EntryId,
    pub property: &'a Property,
    pub value: Option<&'a Value>,
    pub context: &'a PreviewContext,
}

/// Renders the editable field for an array entry.
pub trait FieldBuilder {
    fn build_field(&self, request: FieldRequest<'_>) -> Result<RenderedOutput, SchemaError>;
}

impl<F> FieldBuilder for F
where
    F: Fn(FieldRequest<'_>) -> Result<RenderedOutput, SchemaError>,
{
    fn build_field(&self, request: FieldRequest<'_>) -> Result<RenderedOutput, SchemaError> {
        self(request)
    }
}

/// A field builder that shows entries read-only, through the preview
/// dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyFieldBuilder;

impl FieldBuilder for ReadOnlyFieldBuilder {
    fn build_field(&self, request: FieldRequest<'_>) -> Result<RenderedOutput, SchemaError> {
        preview::render(request.property, request.name, request.value, request.context)
    }
}

/// Tracks a synthetic id per element of an externally owned array.
///
/// The backing array is passed into every operation; the field mirrors its
/// order through ids and mutates it only with [`BackingArray`] commands.
/// Ids are never reused, not even after the entry that held one is removed.
#[derive(Debug)]
pub struct ArrayField<G: IdGenerator = SequenceIdGenerator> {
    name: String,
    ids: Vec<EntryId>,
    issued: HashSet<EntryId>,
    generator: G,
    last_added: Option<EntryId>,
    disabled: bool,
}

/// Draws allowed per id before giving up on a generator.
pub const MAX_ID_ATTEMPTS: usize = 64;

impl ArrayField<SequenceIdGenerator> {
    /// A field with the default sequence generator.
    pub fn with_sequence(name: &str, values: &[Value]) -> Result<Self, ArrayFieldError> {
        Self::initialize(name, SequenceIdGenerator::new(), values)
    }
}

impl<G: IdGenerator> ArrayField<G> {
    /// Assign one fresh id per existing value, preserving order.
    pub fn initialize(name: &str, generator: G, values: &[Value]) -> Result<Self, ArrayFieldError> {
        let mut field = Self {
            name: name.to_string(),
            ids: Vec::with_capacity(values.len()),
            issued: HashSet::new(),
            generator,
            last_added: None,
            disabled: false,
        };
        for _ in values {
            let id = field.fresh_id()?;
            field.ids.push(id);
        }
        Ok(field)
    }

    /// Replace every id after the backing array was swapped out wholesale.
    ///
    /// Old ids are retired, never handed out again.
    pub fn resync(&mut self, values: &[Value]) -> Result<(), ArrayFieldError> {
        debug!(field = %self.name, old = self.ids.len(), new = values.len(), "Resyncing array ids");
        self.ids.clear();
        self.last_added = None;
        for _ in values {
            let id = self.fresh_id()?;
            self.ids.push(id);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ids(&self) -> &[EntryId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id created by the most recent `append`, used to focus the new entry.
    pub fn last_added(&self) -> Option<EntryId> {
        self.last_added
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    /// Disable appending, e.g. while the enclosing form is submitting.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Drag-and-drop type tag shared by every entry of this field.
    pub fn type_tag(&self) -> String {
        format!("array_card_{}", self.name)
    }

    /// Add an entry at the end and insert `null` into the backing array.
    pub fn append<B>(&mut self, backing: &mut B) -> Result<EntryId, ArrayFieldError>
    where
        B: BackingArray + ?Sized,
    {
        if self.disabled {
            return Err(ArrayFieldError::Disabled {
                field: self.name.clone(),
            });
        }
        self.ensure_in_sync(backing)?;
        let id = self.fresh_id()?;
        self.ids.push(id);
        self.last_added = Some(id);
        backing.insert_at_end(Value::Null);
        debug!(field = %self.name, %id, len = self.ids.len(), "Appended array entry");
        Ok(id)
    }

    /// Remove the entry at `position` from both the ids and the backing array.
    pub fn remove<B>(&mut self, backing: &mut B, position: usize) -> Result<EntryId, ArrayFieldError>
    where
        B: BackingArray + ?Sized,
    {
        self.ensure_in_sync(backing)?;
        self.check_bounds(position)?;
        let id = self.ids.remove(position);
        backing.remove_at(position);
        debug!(field = %self.name, %id, position, "Removed array entry");
        Ok(id)
    }

    /// Exchange the entries at `from` and `to`.
    ///
    /// This is a two-element swap, matching "swap under cursor" drag
    /// semantics; it does not shift the entries in between.
    pub fn move_entry<B>(&mut self, backing: &mut B, from: usize, to: usize) -> Result<(), ArrayFieldError>
    where
        B: BackingArray + ?Sized,
    {
        self.ensure_in_sync(backing)?;
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if from == to {
            return Ok(());
        }
        self.ids.swap(from, to);
        backing.move_swap(from, to);
        debug!(field = %self.name, from, to, "Swapped array entries");
        Ok(())
    }

    /// Entries paired with their current values.
    pub fn entries<'a, B>(&self, backing: &'a B) -> Vec<ArrayEntry<'a>>
    where
        B: BackingArray + ?Sized,
    {
        self.ids
            .iter()
            .enumerate()
            .map(|(position, id)| ArrayEntry {
                id: *id,
                position,
                content: backing.get(position),
            })
            .collect()
    }

    /// Render the entry at `position`.
    ///
    /// Reference entries go through the preview dispatcher; anything else is
    /// handed to `builder`.
    pub fn render_entry<B>(
        &self,
        backing: &B,
        position: usize,
        of: &Property,
        context: &PreviewContext,
        builder: &dyn FieldBuilder,
    ) -> Result<RenderedOutput, ArrayFieldError>
    where
        B: BackingArray + ?Sized,
    {
        self.ensure_in_sync(backing)?;
        self.check_bounds(position)?;
        let name = format!("{}[{}]", self.name, position);
        let value = backing.get(position);
        let output = match of.kind {
            PropertyKind::Reference(_) => preview::render(of, &name, value, context)?,
            _ => builder.build_field(FieldRequest {
                name: &name,
                entry_id: self.ids[position],
                property: of,
                value,
                context,
            })?,
        };
        Ok(output)
    }

    /// Draw ids until one has never been issued by this field.
    fn fresh_id(&mut self) -> Result<EntryId, ArrayFieldError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.generator.next_id();
            if self.issued.insert(id) {
                return Ok(id);
            }
            debug!(field = %self.name, %id, "Discarding already issued id");
        }
        Err(ArrayFieldError::IdExhausted {
            field: self.name.clone(),
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn check_bounds(&self, index: usize) -> Result<(), ArrayFieldError> {
        if index < self.ids.len() {
            Ok(())
        } else {
            Err(ArrayFieldError::IndexOutOfBounds {
                field: self.name.clone(),
                index,
                len: self.ids.len(),
            })
        }
    }

    fn ensure_in_sync<B>(&self, backing: &B) -> Result<(), ArrayFieldError>
    where
        B: BackingArray + ?Sized,
    {
        if self.ids.len() == backing.len() {
            Ok(())
        } else {
            Err(ArrayFieldError::OutOfSync {
                field: self.name.clone(),
                ids: self.ids.len(),
                values: backing.len(),
            })
        }
    }
}
