use crate::types::SchemaType;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

/// Message names that generated files must import, accumulated over a run.
///
/// Shared by reference between every file processed in the run. Reads go
/// through [`ImportSet::snapshot`], which copies the set under the lock.
#[derive(Debug, Default)]
pub struct ImportSet {
    names: Mutex<BTreeSet<String>>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`; adding a name twice has no further effect.
    pub fn add(&self, name: impl Into<String>) {
        self.lock().insert(name.into());
    }

    /// Adds the import a resolved type requires, if it requires one.
    pub fn record(&self, schema_type: &SchemaType) {
        if let Some(name) = schema_type.import_name() {
            self.add(name);
        }
    }

    pub fn snapshot(&self) -> BTreeSet<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a set of strings half-updated.
    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.names.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
