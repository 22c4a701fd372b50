//! Ordered, editable collection of wrapped fields
//!
//! Invariant: after every operation, `items[i].order == i`.

mod secret;

pub use secret::{generate_secret, DEFAULT_SECRET_LENGTH};

use tracing::trace;

use crate::config::CollectionConfig;
use crate::field::{FieldDescriptor, FieldError, FieldResult, FieldSpecs, WrappedField};

/// Fields of one table, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCollection {
    items: Vec<WrappedField>,
    config: CollectionConfig,
}

impl FieldCollection {
    /// Creates a collection, reassigning orders to match positions.
    pub fn new(items: Vec<WrappedField>) -> Self {
        Self::with_config(items, CollectionConfig::default())
    }

    pub fn with_config(items: Vec<WrappedField>, config: CollectionConfig) -> Self {
        let mut collection = Self { items, config };
        collection.renumber();
        collection
    }

    pub fn items(&self) -> &[WrappedField] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WrappedField> {
        self.items.iter().find(|field| field.id == id)
    }

    /// Appends a descriptor under a fresh id and returns the id.
    pub fn add(&mut self, item: FieldDescriptor) -> String {
        let id = generate_secret(self.config.id_length);
        trace!(id = %id, key = %item.key, "adding field");
        self.items.push(WrappedField::new(id.clone(), self.items.len() as i64, item));
        id
    }

    /// Adds a deep copy of a field right after it, with `-copy` appended to
    /// the key. Returns the id of the copy, or `None` for an unknown id.
    pub fn copy_by_id(&mut self, id: &str) -> Option<String> {
        let index = self.position(id)?;
        let mut copy = self.items[index].item.clone();
        copy.key.push_str("-copy");

        let copy_id = self.add(copy);
        self.move_item(self.items.len() as i64 - 1, index as i64 + 1);
        Some(copy_id)
    }

    /// Removes the field at `order`. Unknown orders are ignored.
    pub fn remove(&mut self, order: i64) {
        trace!(order, "removing field");
        self.items.retain(|field| field.order != order);
        self.renumber();
    }

    /// Removes the field with `id`. Unknown ids are ignored.
    pub fn remove_by_id(&mut self, id: &str) {
        trace!(id, "removing field");
        self.items.retain(|field| field.id != id);
        self.renumber();
    }

    /// Renames the key of a field.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::UnknownId` if no field has `id`.
    pub fn update_key_by_id(&mut self, id: &str, key: impl Into<String>) -> FieldResult<()> {
        let field = self.field_mut(id)?;
        field.item.key = key.into();
        trace!(id, key = %field.item.key, "renamed field");
        Ok(())
    }

    /// Replaces the specs of a field with specs of the same kind.
    ///
    /// # Errors
    ///
    /// - `FieldError::UnknownId` if no field has `id`
    /// - `FieldError::SpecKindMismatch` if `specs` belong to another kind
    pub fn update_specs_by_id(&mut self, id: &str, specs: FieldSpecs) -> FieldResult<()> {
        let field = self.field_mut(id)?;
        let expected = field.item.kind();
        if specs.kind() != expected {
            return Err(FieldError::SpecKindMismatch {
                expected,
                actual: specs.kind(),
            });
        }

        field.item.specs = specs;
        trace!(id, "updated field specs");
        Ok(())
    }

    /// Moves the field at order `from` to order `to`.
    ///
    /// `to` is clamped into range. An unknown `from` or `from == to` is a no-op.
    pub fn move_item(&mut self, from: i64, to: i64) {
        if from == to || self.items.is_empty() {
            return;
        }
        let Some(from_index) = self.items.iter().position(|field| field.order == from) else {
            return;
        };
        let to_index = to.clamp(0, self.items.len() as i64 - 1) as usize;

        trace!(from, to, "moving field");
        let moved = self.items.remove(from_index);
        self.items.insert(to_index, moved);
        self.renumber();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|field| field.id == id)
    }

    fn field_mut(&mut self, id: &str) -> FieldResult<&mut WrappedField> {
        self.items
            .iter_mut()
            .find(|field| field.id == id)
            .ok_or_else(|| FieldError::UnknownId(id.to_string()))
    }

    fn renumber(&mut self) {
        for (index, field) in self.items.iter_mut().enumerate() {
            field.order = index as i64;
        }
    }
}
