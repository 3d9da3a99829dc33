//! Reputation record storage
//!
//! The engine only sees the [`ReputationStore`] trait; the composition root
//! decides which backend to inject. Durable backends live outside this crate.

mod memory;

pub use memory::InMemoryStore;

use crate::reputation::ReputationRecord;

/// Keyed storage of reputation records.
///
/// Implementations need no cross-call atomicity: the engine serializes
/// read-modify-write sequences per user before touching the store.
pub trait ReputationStore: Send + Sync {
    /// Fetch the record for `user_id`, if one exists.
    fn get(&self, user_id: &str) -> Option<ReputationRecord>;

    /// Insert or replace the record stored under its user id.
    fn put(&self, record: ReputationRecord);

    /// Remove and return the record for `user_id`.
    fn delete(&self, user_id: &str) -> Option<ReputationRecord>;

    /// Snapshot of every stored record, in no particular order.
    fn records(&self) -> Vec<ReputationRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
