//! Result-store collaborator surface.
//!
//! The binning engine never owns result records or the selection set; it reads
//! records through [`ResultStore`] and emits selection changes back through
//! the same trait. [`InMemoryResults`] is the reference implementation used by
//! tests and engine-free hosts.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One search result with its raw attribute map.
///
/// Values may be absent, scalar, or (for multivalued attributes) an array of
/// scalars. Records are opaque to this crate beyond reading values and
/// toggling selection by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub properties: IndexMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Ordered result collection with an externally-owned selection set.
pub trait ResultStore {
    fn records(&self) -> &[Record];

    fn is_selected(&self, id: &str) -> bool;

    fn set_selected(&mut self, id: &str, selected: bool);

    /// Bulk-clears the selection set.
    fn deselect_all(&mut self);

    /// Selected records in collection order.
    fn selected_records(&self) -> Vec<&Record> {
        self.records()
            .iter()
            .filter(|record| self.is_selected(&record.id))
            .collect()
    }
}

/// In-memory stand-in for the host's lazily-populated result collection.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResults {
    records: Vec<Record>,
    selected: IndexSet<String>,
}

impl InMemoryResults {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            selected: IndexSet::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Replaces the whole result set, dropping any selection.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
        self.selected.clear();
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

impl ResultStore for InMemoryResults {
    fn records(&self) -> &[Record] {
        &self.records
    }

    fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    fn set_selected(&mut self, id: &str, selected: bool) {
        if selected {
            if self.records.iter().any(|record| record.id == id) {
                self.selected.insert(id.to_owned());
            }
        } else {
            self.selected.shift_remove(id);
        }
    }

    fn deselect_all(&mut self) {
        self.selected.clear();
    }
}
