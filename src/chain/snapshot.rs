//! Match snapshots.
//!
//! A snapshot is the whole `MatchState` as JSON: board, hands, decks, log,
//! RNG position, the effect chain with its saved continuations, and the
//! outstanding prompt. Decoding a snapshot written before a match had a
//! chain yields an empty chain.
//!
//! ```
//! use compile_ccg::chain::{snapshot, Resolution};
//! use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
//!
//! let mut state = MatchState::new(RulesConfig::default(), 11)
//!     .with_protocols(PlayerId::FIRST, ["Fire", "Water", "Life"]);
//! let card = state.new_card("Fire", 4);
//! state.place_on_lane(PlayerId::FIRST, 0, card);
//!
//! let json = snapshot::encode(&state).unwrap();
//! let restored = snapshot::decode(&json).unwrap();
//! assert_eq!(restored.lane(PlayerId::FIRST, 0).len(), 1);
//! assert!(!Resolution::from_state(restored).is_suspended());
//! ```

use crate::core::{EngineError, MatchState};

/// Serialize a match.
///
/// # Errors
///
/// Returns [`EngineError::Snapshot`] if serialization fails.
pub fn encode(state: &MatchState) -> Result<String, EngineError> {
    Ok(serde_json::to_string(state)?)
}

/// Serialize a match with indentation, for debugging and fixtures.
///
/// # Errors
///
/// Returns [`EngineError::Snapshot`] if serialization fails.
pub fn encode_pretty(state: &MatchState) -> Result<String, EngineError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Restore a match.
///
/// # Errors
///
/// Returns [`EngineError::Snapshot`] if the document is not a valid match.
pub fn decode(json: &str) -> Result<MatchState, EngineError> {
    let state: MatchState = serde_json::from_str(json)?;
    tracing::debug!(
        pending = state.chain.pending_len(),
        depth = state.chain.depth(),
        suspended = state.action_required.is_some(),
        "snapshot restored"
    );
    Ok(state)
}
