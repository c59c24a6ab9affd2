//! Index store: opaque persistence of metadata records by id.
//!
//! The crypto engine consumes this interface but does not implement a
//! durable backend. Records are opaque JSON objects with at least `id`,
//! `hmac` and `timestamp`; the store never looks inside them beyond that.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{SbxError, SbxResult};
use crate::item::{record_id, record_timestamp};

/// Storage of opaque records keyed by their `id` field.
pub trait IndexStore {
    /// Insert or replace a record.
    fn set_item(&mut self, record: Value) -> SbxResult<()>;

    /// Fetch a record by id, `NoSuchIndexItem` if absent.
    fn get_item(&self, id: &str) -> SbxResult<Value>;

    /// Delete a record by id, `NoSuchIndexItem` if absent.
    fn delete_item(&mut self, id: &str) -> SbxResult<()>;

    /// Drop every record.
    fn delete_all_items(&mut self) -> SbxResult<()>;

    /// Records modified strictly after `since` (epoch milliseconds),
    /// for incremental sync.
    fn get_delta(&self, since: u64) -> SbxResult<Vec<Value>>;
}

/// In-memory store, used in tests and as a reference implementation.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    records: HashMap<String, Value>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IndexStore for MemoryIndexStore {
    fn set_item(&mut self, record: Value) -> SbxResult<()> {
        let id = record_id(&record)?.to_string();
        self.records.insert(id, record);
        Ok(())
    }

    fn get_item(&self, id: &str) -> SbxResult<Value> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| SbxError::NoSuchIndexItem(id.to_string()))
    }

    fn delete_item(&mut self, id: &str) -> SbxResult<()> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SbxError::NoSuchIndexItem(id.to_string()))
    }

    fn delete_all_items(&mut self) -> SbxResult<()> {
        self.records.clear();
        Ok(())
    }

    fn get_delta(&self, since: u64) -> SbxResult<Vec<Value>> {
        let mut delta: Vec<Value> = self
            .records
            .values()
            .filter(|record| record_timestamp(record).is_some_and(|ts| ts > since))
            .cloned()
            .collect();
        delta.sort_by_key(|record| record_timestamp(record).unwrap_or(0));
        Ok(delta)
    }
}
