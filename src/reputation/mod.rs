//! Reputation System for Lenders and Borrowers
//!
//! Tracks how reliably a user returns borrowed items, how others rate them
//! and how many disputes were filed against them, and derives a trust score
//! and display badge from those counters.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │ ReputationEvent  │────►│ ReputationEngine │◄───►│ ReputationStore │
//! │ (return/dispute/ │     │ (per-user locks) │     │ (get/put/delete)│
//! │  rating)         │     └──────────────────┘     └─────────────────┘
//! └──────────────────┘              │
//!                                   ▼
//!                          ┌──────────────────┐
//!                          │ ReputationRecord │──► recompute_score ──► classify
//!                          │ (counters)       │     (0..=100)          (Badge)
//!                          └──────────────────┘
//! ```
//!
//! ## Score Model
//!
//! - New users start at 50 ("New User")
//! - On-time return ratio adds up to 30, average rating up to 15
//! - Every 5 completed returns add 1 point, capped at 10
//! - Each dispute costs 5 points
//! - The result is clamped to 0..=100

mod engine;
mod record;
mod score;

pub use engine::{ReputationEngine, ReputationEvent, ReputationSummary};
pub use record::{validate_user_id, ReputationCounters, ReputationRecord};
pub use score::{
    classify, recompute_score, Badge, BASELINE_SCORE, DISPUTE_PENALTY, MAX_RATING, MAX_SCORE,
    MAX_VOLUME_BONUS, MIN_RATING, MIN_SCORE, ON_TIME_WEIGHT, RATING_WEIGHT,
    RETURNS_PER_VOLUME_POINT,
};
