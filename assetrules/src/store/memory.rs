use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;

use super::{Query, RecordStore};
use crate::errors::StoreError;
use crate::fields;
use crate::id::generate_sequence_value;
use crate::record::{FieldValue, Record, RecordId};

/// In-memory [`RecordStore`] for tests and fixture replay.
///
/// `create` stamps `createdon` when missing and fills configured autonumber
/// columns, the way the host platform does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, BTreeMap<RecordId, Record>>,
    autonumber: HashMap<String, String>,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a sequence value for `field` whenever an `entity` record is
    /// created without one.
    pub fn with_autonumber(mut self, entity: &str, field: &str) -> Self {
        self.autonumber.insert(entity.to_string(), field.to_string());
        self
    }

    /// Seeds a record as-is, replacing any record with the same id.
    pub fn insert(&mut self, record: Record) {
        self.records
            .entry(record.entity.clone())
            .or_default()
            .insert(record.id, record);
    }

    pub fn get(&self, entity: &str, id: RecordId) -> Option<&Record> {
        self.records.get(entity).and_then(|records| records.get(&id))
    }

    pub fn records(&self, entity: &str) -> Vec<&Record> {
        self.records
            .get(entity)
            .map(|records| records.values().collect())
            .unwrap_or_default()
    }

    pub fn all_records(&self) -> Vec<&Record> {
        let mut entities: Vec<&String> = self.records.keys().collect();
        entities.sort();
        entities
            .into_iter()
            .flat_map(|entity| self.records[entity].values())
            .collect()
    }

    /// Makes every read of `entity` fail.
    pub fn fail_reads(&mut self, entity: &str) {
        self.failing_reads.insert(entity.to_string());
    }

    /// Makes every create, update and delete of `entity` fail.
    pub fn fail_writes(&mut self, entity: &str) {
        self.failing_writes.insert(entity.to_string());
    }

    fn check_read(&self, entity: &str) -> Result<(), StoreError> {
        if self.failing_reads.contains(entity) {
            return Err(StoreError::Unavailable {
                message: Cow::Owned(format!("reads of {entity} are disabled")),
            });
        }
        Ok(())
    }

    fn check_write(&self, entity: &str) -> Result<(), StoreError> {
        if self.failing_writes.contains(entity) {
            return Err(StoreError::Unavailable {
                message: Cow::Owned(format!("writes to {entity} are disabled")),
            });
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn retrieve(&self, entity: &str, id: RecordId, columns: &[&str]) -> Result<Record, StoreError> {
        self.check_read(entity)?;
        let record = self.get(entity, id).ok_or_else(|| StoreError::NotFound {
            entity: entity.to_string(),
            id,
        })?;
        if columns.is_empty() {
            Ok(record.clone())
        } else {
            Ok(record.project(columns))
        }
    }

    fn retrieve_multiple(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        self.check_read(&query.entity)?;
        let mut matched: Vec<&Record> = self
            .records
            .get(&query.entity)
            .map(|records| records.values().filter(|record| query.matches(record)).collect())
            .unwrap_or_default();
        matched.sort_by(|left, right| query.compare(left, right));

        let limit = query.top.unwrap_or(matched.len());
        let columns: Option<Vec<&str>> = query
            .columns
            .as_ref()
            .map(|columns| columns.iter().map(String::as_str).collect());
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|record| match &columns {
                Some(columns) => record.project(columns),
                None => record.clone(),
            })
            .collect())
    }

    fn create(&mut self, mut record: Record) -> Result<RecordId, StoreError> {
        self.check_write(&record.entity)?;
        if self.get(&record.entity, record.id).is_some() {
            return Err(StoreError::InvalidRecord {
                message: Cow::Owned(format!("{} record {} already exists", record.entity, record.id)),
            });
        }
        if !record.contains(fields::cycle::CREATED_ON) {
            record.set(fields::cycle::CREATED_ON, Utc::now());
        }
        if let Some(field) = self.autonumber.get(&record.entity)
            && record.non_empty_text(field).is_none()
        {
            record.set(field, FieldValue::Text(generate_sequence_value()));
        }
        let id = record.id;
        self.insert(record);
        Ok(id)
    }

    fn update(&mut self, changes: &Record) -> Result<(), StoreError> {
        self.check_write(&changes.entity)?;
        let stored = self
            .records
            .get_mut(&changes.entity)
            .and_then(|records| records.get_mut(&changes.id))
            .ok_or_else(|| StoreError::NotFound {
                entity: changes.entity.clone(),
                id: changes.id,
            })?;
        stored.apply(changes);
        Ok(())
    }

    fn delete(&mut self, entity: &str, id: RecordId) -> Result<(), StoreError> {
        self.check_write(entity)?;
        self.records
            .get_mut(entity)
            .and_then(|records| records.remove(&id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: entity.to_string(),
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Condition, SortOrder};

    #[test]
    fn create_stamps_created_on_and_autonumber() {
        let mut store = MemoryStore::new().with_autonumber("rel_asset", "rel_uniqueidentifier");
        let id = store.create(Record::new("rel_asset", RecordId::new())).unwrap();
        let record = store.get("rel_asset", id).unwrap();
        assert!(record.datetime("createdon").is_some());
        assert_eq!(record.text("rel_uniqueidentifier").map(str::len), Some(6));
    }

    #[test]
    fn create_keeps_supplied_sequence() {
        let mut store = MemoryStore::new().with_autonumber("rel_asset", "rel_uniqueidentifier");
        let id = store
            .create(Record::new("rel_asset", RecordId::new()).with("rel_uniqueidentifier", "42"))
            .unwrap();
        assert_eq!(store.get("rel_asset", id).unwrap().text("rel_uniqueidentifier"), Some("42"));
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let mut store = MemoryStore::new();
        let record = Record::new("e", RecordId::new());
        store.create(record.clone()).unwrap();
        assert!(matches!(store.create(record), Err(StoreError::InvalidRecord { .. })));
    }

    #[test]
    fn update_merges_and_missing_record_fails() {
        let mut store = MemoryStore::new();
        let id = RecordId::new();
        store.insert(Record::new("e", id).with("a", "1").with("b", "2"));
        store.update(&Record::new("e", id).with("b", "3")).unwrap();
        let record = store.get("e", id).unwrap();
        assert_eq!(record.text("a"), Some("1"));
        assert_eq!(record.text("b"), Some("3"));

        let err = store.update(&Record::new("e", RecordId::new())).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn retrieve_projects_columns() {
        let mut store = MemoryStore::new();
        let id = RecordId::new();
        store.insert(Record::new("e", id).with("a", "1").with("b", "2"));
        let record = store.retrieve("e", id, &["b"]).unwrap();
        assert_eq!(record.attributes.len(), 1);
        assert_eq!(store.retrieve("e", id, &[]).unwrap().attributes.len(), 2);
    }

    #[test]
    fn query_filters_orders_and_limits() {
        let mut store = MemoryStore::new();
        for n in [3, 1, 2] {
            store.insert(
                Record::new("e", RecordId::new())
                    .with("group", "g")
                    .with("n", FieldValue::Integer(n)),
            );
        }
        store.insert(Record::new("e", RecordId::new()).with("group", "other").with("n", FieldValue::Integer(9)));

        let query = Query::new("e")
            .filter(Condition::field_eq("group", "g"))
            .order_by("n", SortOrder::Desc)
            .top(2);
        let found = store.retrieve_multiple(&query).unwrap();
        let values: Vec<i64> = found.iter().filter_map(|record| record.integer("n")).collect();
        assert_eq!(values, vec![3, 2]);
    }

    #[test]
    fn disabled_operations_fail() {
        let mut store = MemoryStore::new();
        let id = RecordId::new();
        store.insert(Record::new("e", id));
        store.fail_reads("e");
        store.fail_writes("e");
        assert!(matches!(store.retrieve("e", id, &[]), Err(StoreError::Unavailable { .. })));
        assert!(matches!(store.delete("e", id), Err(StoreError::Unavailable { .. })));
    }
}
