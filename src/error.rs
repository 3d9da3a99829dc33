//! Error types for the reputation engine.

/// Errors surfaced by reputation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReputationError {
    /// No reputation record exists for the user. Nothing was mutated.
    #[error("no reputation record for user {user_id}")]
    NotFound { user_id: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl ReputationError {
    pub fn not_found(user_id: impl Into<String>) -> Self {
        Self::NotFound {
            user_id: user_id.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReputationError::NotFound { .. })
    }
}

pub type ReputationResult<T> = Result<T, ReputationError>;
