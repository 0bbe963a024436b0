//! Record store collaborators for the search service.

use crate::data::poi::PointOfInterest;
use crate::Result;

/// The external record store. Soft-delete and visibility restrictions are
/// applied inside the store; the search service never sees hidden records.
pub trait PoiStore {
    /// All visible records, in the store's natural order. Store failures
    /// propagate unmodified.
    fn find_all(&self) -> Result<Vec<PointOfInterest>>;
}

/// In-process store backed by a Vec, for tests and headless embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<PointOfInterest>,
}

impl MemoryStore {
    pub fn new(records: Vec<PointOfInterest>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: PointOfInterest) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PoiStore for MemoryStore {
    fn find_all(&self) -> Result<Vec<PointOfInterest>> {
        Ok(self.records.clone())
    }
}
