//! In-memory record store backed by a concurrent map

use dashmap::DashMap;
use tracing::debug;

use super::ReputationStore;
use crate::reputation::ReputationRecord;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<String, ReputationRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }
}

impl ReputationStore for InMemoryStore {
    fn get(&self, user_id: &str) -> Option<ReputationRecord> {
        self.records.get(user_id).map(|entry| entry.value().clone())
    }

    fn put(&self, record: ReputationRecord) {
        debug!(user_id = %record.user_id(), trust_score = record.trust_score(), "Storing record");
        self.records.insert(record.user_id().to_string(), record);
    }

    fn delete(&self, user_id: &str) -> Option<ReputationRecord> {
        self.records.remove(user_id).map(|(_, record)| record)
    }

    fn records(&self) -> Vec<ReputationRecord> {
        self.records.iter().map(|entry| entry.value().clone()).collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
