//! Registered fields: the context keys projected into every log entry

use super::field::Field;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Concurrency-safe, ordered set of fields an engine extracts from contexts.
///
/// Mutations replace the inner set under the write lock; emissions take an `Arc`
/// snapshot under the read lock, so a reader sees the set either before or after a
/// mutation and never in between. Iteration follows the lexical order of field names.
#[derive(Debug)]
pub struct FieldRegistry {
    fields: RwLock<Arc<BTreeSet<Field>>>,
}

impl FieldRegistry {
    /// Create a registry seeded with [`Field::DEFAULTS`]
    pub fn new() -> Self {
        Self::with_fields(Field::DEFAULTS)
    }

    /// Create a registry holding exactly `fields`
    pub fn with_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Self {
            fields: RwLock::new(Arc::new(fields.into_iter().collect())),
        }
    }

    /// Add fields; already registered fields are left as they are
    pub fn register<I>(&self, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        let mut guard = self.fields.write();
        let set = Arc::make_mut(&mut guard);
        for field in fields {
            set.insert(field);
        }
    }

    /// Remove fields; fields that are not registered are ignored
    pub fn unregister<'a, I>(&self, fields: I)
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let mut guard = self.fields.write();
        let set = Arc::make_mut(&mut guard);
        for field in fields {
            set.remove(field);
        }
    }

    /// Replace the registered set with exactly the default fields
    pub fn reset_to_defaults(&self) {
        *self.fields.write() = Arc::new(Field::DEFAULTS.into_iter().collect());
    }

    /// Sorted copy of the registered fields
    pub fn list(&self) -> Vec<Field> {
        self.fields.read().iter().cloned().collect()
    }

    pub fn contains(&self, field: &Field) -> bool {
        self.fields.read().contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    pub(crate) fn snapshot(&self) -> Arc<BTreeSet<Field>> {
        Arc::clone(&self.fields.read())
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}
