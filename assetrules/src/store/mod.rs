//! Data-access capability used by record handlers.

mod memory;
mod query;

pub use memory::MemoryStore;
pub use query::{Condition, ConditionOperator, ConditionTarget, OrderBy, Query, SortOrder};

use crate::errors::StoreError;
use crate::record::{Record, RecordId};

/// Synchronous record CRUD and query calls against the host data store.
pub trait RecordStore {
    /// Loads one record. An empty `columns` slice returns every attribute.
    fn retrieve(&self, entity: &str, id: RecordId, columns: &[&str]) -> Result<Record, StoreError>;

    fn retrieve_multiple(&self, query: &Query) -> Result<Vec<Record>, StoreError>;

    fn create(&mut self, record: Record) -> Result<RecordId, StoreError>;

    /// Merges the attributes of `changes` into the stored record with the same id.
    fn update(&mut self, changes: &Record) -> Result<(), StoreError>;

    fn delete(&mut self, entity: &str, id: RecordId) -> Result<(), StoreError>;
}
