//! Match log: the player-visible record of what the engine did.
//!
//! Diagnostics go through `tracing`; the match log is game data. It is part
//! of `MatchState`, so it is snapshotted and restored with everything else.

use serde::{Deserialize, Serialize};

use super::entity::CardId;
use super::player::PlayerId;

/// One line of the match log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number within the match.
    pub sequence: u32,

    /// The player the line is about, if any.
    pub player: Option<PlayerId>,

    /// The card whose effect produced the line, if any.
    pub source: Option<CardId>,

    /// Human-readable message.
    pub message: String,
}

impl LogEntry {
    /// Create a log entry.
    #[must_use]
    pub fn new(
        sequence: u32,
        player: Option<PlayerId>,
        source: Option<CardId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            player,
            source,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.player {
            Some(player) => write!(f, "[{}] {}: {}", self.sequence, player, self.message),
            None => write!(f, "[{}] {}", self.sequence, self.message),
        }
    }
}
