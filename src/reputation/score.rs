//! Trust Score Formula and Badges
//!
//! The trust score is a pure function of a user's reputation counters:
//!
//! ```text
//! score = 50
//!       + round(30 × on_time / (on_time + late))      if any returns
//!       + round(15 × avg_rating / 5)                  if any ratings
//!       + min(10, floor((on_time + late) / 5))
//!       - 5 × disputes
//! clamped to [0, 100]
//! ```
//!
//! Both rounded terms round half away from zero and are rounded
//! independently before summing.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::ReputationCounters;

/// Score of a freshly registered user
pub const BASELINE_SCORE: u8 = 50;

/// Maximum contribution of the on-time return ratio
pub const ON_TIME_WEIGHT: u64 = 30;

/// Maximum contribution of the average rating
pub const RATING_WEIGHT: u64 = 15;

/// Highest star rating a user can receive
pub const MAX_RATING: u8 = 5;

/// Lowest star rating a user can receive
pub const MIN_RATING: u8 = 1;

/// Completed transactions needed per volume bonus point
pub const RETURNS_PER_VOLUME_POINT: u64 = 5;

/// Cap on the transaction volume bonus
pub const MAX_VOLUME_BONUS: u64 = 10;

/// Points deducted per dispute filed against the user
pub const DISPUTE_PENALTY: u64 = 5;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

/// Compute the trust score for a set of counters.
pub fn recompute_score(counters: &ReputationCounters) -> u8 {
    let total_returns = counters.total_returns();

    let mut score = BASELINE_SCORE as i128;
    score += on_time_bonus(counters.on_time_returns, total_returns) as i128;
    score += rating_bonus(counters.rating_sum, counters.total_ratings) as i128;
    score += volume_bonus(total_returns) as i128;
    score -= (counters.disputes_against as i128) * (DISPUTE_PENALTY as i128);

    score.clamp(MIN_SCORE as i128, MAX_SCORE as i128) as u8
}

/// round(30 × on_time / total), or 0 with no returns
fn on_time_bonus(on_time: u64, total: u64) -> u128 {
    if total == 0 {
        return 0;
    }
    div_round(ON_TIME_WEIGHT as u128 * on_time as u128, total as u128)
}

/// round(15 × (sum / count) / 5), or 0 with no ratings
fn rating_bonus(rating_sum: u64, total_ratings: u64) -> u128 {
    if total_ratings == 0 {
        return 0;
    }
    // 15 × avg / 5 == 15 × sum / (5 × count), kept in integers so .5 ties are exact
    div_round(
        RATING_WEIGHT as u128 * rating_sum as u128,
        MAX_RATING as u128 * total_ratings as u128,
    )
}

fn volume_bonus(total_returns: u64) -> u64 {
    (total_returns / RETURNS_PER_VOLUME_POINT).min(MAX_VOLUME_BONUS)
}

/// Non-negative division rounding half away from zero
fn div_round(numerator: u128, denominator: u128) -> u128 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Display label for a trust score range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Badge {
    /// Below 50
    Caution,
    /// 50 - 69
    #[serde(rename = "New User")]
    NewUser,
    /// 70 - 84
    Reliable,
    /// 85 - 94
    Trusted,
    /// 95 and above
    Elite,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Elite => "Elite",
            Badge::Trusted => "Trusted",
            Badge::Reliable => "Reliable",
            Badge::NewUser => "New User",
            Badge::Caution => "Caution",
        }
    }

    /// Lowest score that earns this badge
    pub fn min_score(&self) -> u8 {
        match self {
            Badge::Elite => 95,
            Badge::Trusted => 85,
            Badge::Reliable => 70,
            Badge::NewUser => 50,
            Badge::Caution => MIN_SCORE,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a trust score into its badge.
pub fn classify(score: u8) -> Badge {
    match score {
        95..=u8::MAX => Badge::Elite,
        85..=94 => Badge::Trusted,
        70..=84 => Badge::Reliable,
        50..=69 => Badge::NewUser,
        _ => Badge::Caution,
    }
}
