//! Per-user reputation record
//!
//! Counters only grow. The trust score is derived and is recomputed by every
//! mutation, so there are no setters for either.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::score::{classify, recompute_score, Badge, BASELINE_SCORE, MAX_RATING, MIN_RATING};
use crate::error::{ReputationError, ReputationResult};

/// Raw counters a trust score is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationCounters {
    pub on_time_returns: u64,
    pub late_returns: u64,
    pub disputes_against: u64,
    pub total_ratings: u64,
    /// Sum of all 1-5 star ratings received
    pub rating_sum: u64,
}

impl ReputationCounters {
    pub fn total_returns(&self) -> u64 {
        self.on_time_returns.saturating_add(self.late_returns)
    }

    /// Every rating lies in 1..=5, so the sum is bounded by the count.
    pub fn validate(&self) -> ReputationResult<()> {
        let max_sum = self.total_ratings.saturating_mul(MAX_RATING as u64);
        let min_sum = self.total_ratings.saturating_mul(MIN_RATING as u64);
        if self.rating_sum > max_sum || self.rating_sum < min_sum {
            return Err(ReputationError::invalid_input(format!(
                "rating_sum {} inconsistent with {} ratings",
                self.rating_sum, self.total_ratings
            )));
        }
        Ok(())
    }

    /// Average star rating, if any ratings were received
    pub fn average_rating(&self) -> Option<f64> {
        if self.total_ratings == 0 {
            return None;
        }
        Some(self.rating_sum as f64 / self.total_ratings as f64)
    }

    /// Share of returns that were on time (0.0 - 1.0)
    pub fn on_time_ratio(&self) -> Option<f64> {
        let total = self.total_returns();
        if total == 0 {
            return None;
        }
        Some(self.on_time_returns as f64 / total as f64)
    }
}

/// User ids must be non-empty with no surrounding whitespace.
pub fn validate_user_id(user_id: &str) -> ReputationResult<()> {
    if user_id.is_empty() {
        return Err(ReputationError::invalid_input("user_id must not be empty"));
    }
    if user_id.trim() != user_id {
        return Err(ReputationError::invalid_input(format!(
            "user_id {:?} has surrounding whitespace",
            user_id
        )));
    }
    Ok(())
}

/// Reputation of a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord", into = "StoredRecord")]
pub struct ReputationRecord {
    user_id: String,
    counters: ReputationCounters,
    trust_score: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReputationRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            counters: ReputationCounters::default(),
            trust_score: BASELINE_SCORE,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn counters(&self) -> &ReputationCounters {
        &self.counters
    }

    pub fn trust_score(&self) -> u8 {
        self.trust_score
    }

    pub fn badge(&self) -> Badge {
        classify(self.trust_score)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record a returned item as on time or late.
    pub fn record_return(&mut self, on_time: bool) {
        if on_time {
            self.counters.on_time_returns = self.counters.on_time_returns.saturating_add(1);
        } else {
            self.counters.late_returns = self.counters.late_returns.saturating_add(1);
        }
        self.touch();
    }

    /// Record a dispute filed against this user.
    pub fn record_dispute(&mut self) {
        self.counters.disputes_against = self.counters.disputes_against.saturating_add(1);
        self.touch();
    }

    /// Add a 1-5 star rating. Out-of-range ratings leave the record untouched.
    pub fn add_rating(&mut self, rating: u8) -> ReputationResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ReputationError::invalid_input(format!(
                "rating {} outside {}..={}",
                rating, MIN_RATING, MAX_RATING
            )));
        }
        self.counters.total_ratings = self.counters.total_ratings.saturating_add(1);
        self.counters.rating_sum = self.counters.rating_sum.saturating_add(rating as u64);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.trust_score = recompute_score(&self.counters);
        self.updated_at = Utc::now();
    }
}

/// Serialized form. The stored score is written for readers but never trusted
/// on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    user_id: String,
    #[serde(flatten)]
    counters: ReputationCounters,
    #[serde(default)]
    trust_score: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoredRecord> for ReputationRecord {
    type Error = ReputationError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        validate_user_id(&stored.user_id)?;
        stored.counters.validate()?;
        Ok(Self {
            trust_score: recompute_score(&stored.counters),
            user_id: stored.user_id,
            counters: stored.counters,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }
}

impl From<ReputationRecord> for StoredRecord {
    fn from(record: ReputationRecord) -> Self {
        Self {
            user_id: record.user_id,
            counters: record.counters,
            trust_score: record.trust_score,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
