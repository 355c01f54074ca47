use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{EntityStore, StoreError};

/// In-memory [`EntityStore`]. A `BTreeMap` keeps keys ordered so prefix
/// scans are a bounded range walk. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Value>> {
        self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Value>> {
        self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read().get(key).cloned())
    }

    async fn put(&self, key: &str, record: Value) -> Result<(), StoreError> {
        self.write().insert(key.to_string(), record);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.write().remove(key).is_some())
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<Value>, StoreError> {
        let records = self.read();
        Ok(records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_then_get_returns_the_record() {
        let store = MemoryStore::new();
        store.put("event#1", json!({"title": "Beach Cleanup"})).await.unwrap();

        let record = store.get("event#1").await.unwrap();
        assert_eq!(record, Some(json!({"title": "Beach Cleanup"})));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("event#nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_record_existed() {
        let store = MemoryStore::new();
        store.put("rsvp#a", json!({})).await.unwrap();

        assert!(store.delete("rsvp#a").await.unwrap());
        assert!(!store.delete("rsvp#a").await.unwrap());
        assert_eq!(store.get("rsvp#a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn scan_returns_only_prefix_matches_in_key_order() {
        let store = MemoryStore::new();
        store.put("rsvp#e1#bob", json!({"user": "bob"})).await.unwrap();
        store.put("rsvp#e1#alice", json!({"user": "alice"})).await.unwrap();
        store.put("rsvp#e2#carol", json!({"user": "carol"})).await.unwrap();
        store.put("event#e1", json!({"title": "t"})).await.unwrap();

        let records = store.scan("rsvp#e1#").await.unwrap();
        assert_eq!(records, vec![json!({"user": "alice"}), json!({"user": "bob"})]);
    }

    #[tokio::test]
    async fn scan_with_no_matches_is_empty() {
        let store = MemoryStore::new();
        store.put("event#e1", json!({})).await.unwrap();
        assert!(store.scan("rsvp#").await.unwrap().is_empty());
    }
}
