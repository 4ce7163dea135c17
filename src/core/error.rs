//! Engine error types.
//!
//! The scheduler itself never fails: unsatisfiable effects, stale references
//! and unknown actions all degrade to logged no-ops. Errors only surface at
//! the boundaries, when validating a caller's choice or when reading and
//! writing snapshots and protocol records.

use super::CardId;

/// Errors surfaced at the engine's input and persistence boundaries.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid selection for {expected}: {reason}")]
    InvalidSelection {
        expected: &'static str,
        reason: String,
    },

    #[error("card {0} is not on the board or in any hand")]
    UnknownCard(CardId),

    #[error("unknown protocol '{0}'")]
    UnknownProtocol(String),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("protocol store failed: {0}")]
    Store(String),
}

impl EngineError {
    /// Shorthand for an invalid selection.
    pub fn invalid(expected: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            expected,
            reason: reason.into(),
        }
    }
}
