//! Reputation Engine - Main Orchestrator
//!
//! Looks records up in the injected store, applies counter events and writes
//! the recomputed record back. Read-modify-write sequences are serialized per
//! user so concurrent events on one record never lose updates.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::record::{validate_user_id, ReputationCounters, ReputationRecord};
use super::score::Badge;
use crate::error::{ReputationError, ReputationResult};
use crate::store::ReputationStore;

/// Application events that change a user's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReputationEvent {
    ReturnRecorded { on_time: bool },
    DisputeFiled,
    RatingSubmitted { rating: u8 },
}

/// Display view of a user's reputation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReputationSummary {
    pub user_id: String,
    pub trust_score: u8,
    pub badge: Badge,
    #[serde(flatten)]
    pub counters: ReputationCounters,
    pub average_rating: Option<f64>,
    pub on_time_ratio: Option<f64>,
}

impl From<&ReputationRecord> for ReputationSummary {
    fn from(record: &ReputationRecord) -> Self {
        let counters = *record.counters();
        Self {
            user_id: record.user_id().to_string(),
            trust_score: record.trust_score(),
            badge: record.badge(),
            counters,
            average_rating: counters.average_rating(),
            on_time_ratio: counters.on_time_ratio(),
        }
    }
}

pub struct ReputationEngine<S: ReputationStore> {
    store: Arc<S>,

    /// Per-user write locks (user_id -> lock)
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: ReputationStore> ReputationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create the record for a newly registered user.
    ///
    /// Registering an existing user returns the stored record unchanged.
    pub async fn register(&self, user_id: &str) -> ReputationResult<ReputationRecord> {
        validate_user_id(user_id)?;

        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.store.get(user_id) {
            debug!(user_id = %user_id, "User already registered");
            return Ok(existing);
        }

        let record = ReputationRecord::new(user_id);
        self.store.put(record.clone());

        info!(
            user_id = %user_id,
            trust_score = record.trust_score(),
            "Registered reputation record"
        );

        Ok(record)
    }

    /// Record a returned item as on time or late
    pub async fn record_return(&self, user_id: &str, on_time: bool) -> ReputationResult<ReputationRecord> {
        self.apply(user_id, ReputationEvent::ReturnRecorded { on_time }).await
    }

    /// Record a dispute filed against the user
    pub async fn record_dispute(&self, user_id: &str) -> ReputationResult<ReputationRecord> {
        self.apply(user_id, ReputationEvent::DisputeFiled).await
    }

    /// Add a 1-5 star rating received by the user
    pub async fn add_rating(&self, user_id: &str, rating: u8) -> ReputationResult<ReputationRecord> {
        self.apply(user_id, ReputationEvent::RatingSubmitted { rating }).await
    }

    /// Apply a counter event and persist the recomputed record.
    pub async fn apply(&self, user_id: &str, event: ReputationEvent) -> ReputationResult<ReputationRecord> {
        let lock = self.lock_for(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.apply_locked(user_id, event)
        };
        drop(lock);

        if matches!(result, Err(ReputationError::NotFound { .. })) {
            self.release_lock(user_id);
        }
        result
    }

    fn apply_locked(&self, user_id: &str, event: ReputationEvent) -> ReputationResult<ReputationRecord> {
        let mut record = match self.store.get(user_id) {
            Some(record) => record,
            None => {
                debug!(user_id = %user_id, event = ?event, "Event for unknown user");
                return Err(ReputationError::not_found(user_id));
            }
        };

        let previous_score = record.trust_score();
        let previous_badge = record.badge();

        match event {
            ReputationEvent::ReturnRecorded { on_time } => record.record_return(on_time),
            ReputationEvent::DisputeFiled => record.record_dispute(),
            ReputationEvent::RatingSubmitted { rating } => {
                if let Err(e) = record.add_rating(rating) {
                    warn!(user_id = %user_id, rating = rating, "Rejected rating");
                    return Err(e);
                }
            }
        }

        self.store.put(record.clone());

        debug!(
            user_id = %user_id,
            event = ?event,
            previous_score = previous_score,
            trust_score = record.trust_score(),
            "Applied reputation event"
        );

        let badge = record.badge();
        if badge != previous_badge {
            info!(
                user_id = %user_id,
                from = %previous_badge,
                to = %badge,
                trust_score = record.trust_score(),
                "Badge changed"
            );
        }

        Ok(record)
    }

    pub async fn get_record(&self, user_id: &str) -> ReputationResult<ReputationRecord> {
        self.store
            .get(user_id)
            .ok_or_else(|| ReputationError::not_found(user_id))
    }

    pub async fn summary(&self, user_id: &str) -> ReputationResult<ReputationSummary> {
        let record = self.get_record(user_id).await?;
        Ok(ReputationSummary::from(&record))
    }

    /// Destroy a user's record when the user is deleted.
    pub async fn remove(&self, user_id: &str) -> ReputationResult<ReputationRecord> {
        let lock = self.lock_for(user_id);
        let removed = {
            let _guard = lock.lock().await;
            self.store.delete(user_id)
        };
        drop(lock);
        self.release_lock(user_id);

        match removed {
            Some(record) => {
                info!(user_id = %user_id, trust_score = record.trust_score(), "Removed reputation record");
                Ok(record)
            }
            None => Err(ReputationError::not_found(user_id)),
        }
    }

    /// Highest trust scores first, ties by user id
    pub async fn leaderboard(&self, limit: usize) -> Vec<ReputationSummary> {
        let mut summaries: Vec<ReputationSummary> = self
            .store
            .records()
            .iter()
            .map(ReputationSummary::from)
            .collect();

        summaries.sort_by(|a, b| {
            b.trust_score
                .cmp(&a.trust_score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        summaries.truncate(limit);
        summaries
    }

    fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry unless another task still holds it.
    fn release_lock(&self, user_id: &str) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
