//! Count resolution.
//!
//! A `CountSpec` is either a literal or one of a small vocabulary of
//! formulas evaluated against the match and the chain's context data.
//!
//! | Tag | Value |
//! |---|---|
//! | `fixed` | the literal |
//! | `equal_to_card_value` | effective value of the card a prior effect referenced (0 if it left the board) |
//! | `equal_to_discarded` | cards discarded by the preceding discard, plus `offset` |
//! | `hand_size` | acting player's hand size now |
//! | `previous_hand_size` | acting player's hand size snapshotted by a prior effect |
//! | `count_face_down` | face-down cards on the board, optionally in the source lane only |
//!
//! A missing spec counts as 1. Executors never use a raw result directly;
//! they pass it through [`validate_count`] first.

use serde::{Deserialize, Serialize};

use super::context::EffectContext;
use super::modifiers;
use crate::core::MatchState;

/// How many times an action applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CountSpec {
    Fixed {
        value: i32,
    },
    EqualToCardValue,
    EqualToDiscarded {
        #[serde(default)]
        offset: i32,
    },
    HandSize,
    PreviousHandSize,
    CountFaceDown {
        #[serde(default)]
        this_lane_only: bool,
    },
}

impl CountSpec {
    /// Literal count.
    #[must_use]
    pub const fn fixed(value: i32) -> Self {
        Self::Fixed { value }
    }
}

/// Evaluate a count. `None` counts as 1.
#[must_use]
pub fn resolve_count(spec: Option<&CountSpec>, ctx: &EffectContext<'_>, state: &MatchState) -> i32 {
    let Some(spec) = spec else {
        return 1;
    };
    match *spec {
        CountSpec::Fixed { value } => value,
        CountSpec::EqualToCardValue => {
            let Some(card) = ctx.data().referenced_card else {
                tracing::warn!(source = %ctx.source_card(), "card value count without a referenced card");
                return 0;
            };
            match modifiers::card_effective_value(state, card) {
                Some(value) => value,
                None => {
                    tracing::warn!(%card, "referenced card left the board; count is 0");
                    0
                }
            }
        }
        CountSpec::EqualToDiscarded { offset } => {
            ctx.data().discarded_count.unwrap_or(0) as i32 + offset
        }
        CountSpec::HandSize => state.hand_size(ctx.owner()) as i32,
        CountSpec::PreviousHandSize => ctx.data().previous_hand_size.unwrap_or(0) as i32,
        CountSpec::CountFaceDown { this_lane_only } => state
            .board()
            .filter(|(loc, card)| !card.face_up && (!this_lane_only || loc.lane == ctx.lane()))
            .count() as i32,
    }
}

/// Clamp a raw count for use by an executor: missing or negative is 0.
#[must_use]
pub fn validate_count(count: Option<i32>) -> u32 {
    count.map_or(0, |n| n.max(0) as u32)
}

/// `resolve_count` followed by `validate_count`.
#[must_use]
pub fn effective_count(spec: Option<&CountSpec>, ctx: &EffectContext<'_>, state: &MatchState) -> u32 {
    validate_count(Some(resolve_count(spec, ctx, state)))
}
