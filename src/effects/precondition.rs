//! Precondition checks.
//!
//! Before an effect runs, the scheduler asks whether it can do anything at
//! all. An optional effect that cannot is skipped silently (it is simply not
//! offered). A mandatory one resolves to a logged no-op instead of a prompt
//! nobody could answer.
//!
//! | Action | Needs |
//! |---|---|
//! | flip, shift, delete, return | a legal target, unless it targets its own card |
//! | draw | cards in deck (or discard, when reshuffling is on) |
//! | discard, give, reveal own hand | cards in the relevant hand |
//! | take, reveal opponent hand | cards in the opponent's hand |
//! | play | a card in hand (or deck) and a lane it may go to |
//!
//! A count that resolves to zero fails the check for every counted action.

use serde::{Deserialize, Serialize};

use super::count::effective_count;
use super::context::EffectContext;
use super::definition::{
    DeleteParams, EffectAction, FlipParams, PlayParams, PlaySource, ReturnParams, RevealSource,
    ShiftParams,
};
use super::executors::{board_candidates, play_lanes, side_player, BoardPick};
use crate::chain::{BoardPurpose, ChainEntry};
use crate::core::{MatchState, PlayerId};

/// Why an effect cannot execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoTargets,
    EmptyHand,
    EmptyDeck,
    ZeroCount,
    NoLanes,
    NoOptions,
}

impl SkipReason {
    /// Log text.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::NoTargets => "no valid targets",
            Self::EmptyHand => "no cards in hand",
            Self::EmptyDeck => "no cards to draw",
            Self::ZeroCount => "count is zero",
            Self::NoLanes => "no lane to play into",
            Self::NoOptions => "no options",
        }
    }
}

/// Result of a precondition check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precondition {
    pub can_execute: bool,
    pub skip_reason: Option<SkipReason>,
    /// Number of legal targets, for targeted actions.
    pub target_count: Option<usize>,
}

impl Precondition {
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            can_execute: true,
            skip_reason: None,
            target_count: None,
        }
    }

    #[must_use]
    pub const fn fail(reason: SkipReason) -> Self {
        Self {
            can_execute: false,
            skip_reason: Some(reason),
            target_count: None,
        }
    }

    fn targets(count: usize) -> Self {
        Self {
            can_execute: count > 0,
            skip_reason: (count == 0).then_some(SkipReason::NoTargets),
            target_count: Some(count),
        }
    }

    /// An optional effect that cannot execute is dropped without a prompt
    /// and without a log line.
    #[must_use]
    pub fn should_skip_silently(&self, optional: bool) -> bool {
        optional && !self.can_execute
    }
}

/// Check whether `entry` can execute against `state`.
#[must_use]
pub fn check(state: &MatchState, entry: &ChainEntry) -> Precondition {
    let ctx = EffectContext::new(entry);
    match &entry.definition.params {
        EffectAction::Draw(params) => {
            if effective_count(params.count.as_ref(), &ctx, state) == 0 {
                return Precondition::fail(SkipReason::ZeroCount);
            }
            let player = side_player(&ctx, params.target);
            if drawable(state, player) == 0 {
                Precondition::fail(SkipReason::EmptyDeck)
            } else {
                Precondition::pass()
            }
        }
        EffectAction::Flip(params) => check_flip(state, &ctx, params),
        EffectAction::Shift(params) => check_shift(state, &ctx, params),
        EffectAction::Delete(params) => check_delete(state, &ctx, params),
        EffectAction::Return(params) => check_return(state, &ctx, params),
        EffectAction::Discard(params) => {
            let player = side_player(&ctx, params.actor);
            if state.hand_size(player) == 0 {
                Precondition::fail(SkipReason::EmptyHand)
            } else if !params.all && effective_count(params.count.as_ref(), &ctx, state) == 0 {
                Precondition::fail(SkipReason::ZeroCount)
            } else {
                Precondition::pass()
            }
        }
        EffectAction::Play(params) => check_play(state, &ctx, params),
        EffectAction::Reveal(params) => match &params.source {
            RevealSource::OwnHand => hand_check(state.hand_size(ctx.owner())),
            RevealSource::OpponentHand => hand_check(state.hand_size(ctx.opponent())),
            RevealSource::FaceDownCard { filter } => {
                let pick = BoardPick::new(BoardPurpose::Reveal, *filter, Default::default());
                Precondition::targets(board_candidates(state, &ctx, &pick, &[]).len())
            }
        },
        EffectAction::Give(params) => {
            if effective_count(params.count.as_ref(), &ctx, state) == 0 {
                Precondition::fail(SkipReason::ZeroCount)
            } else {
                hand_check(state.hand_size(ctx.owner()))
            }
        }
        EffectAction::Take(params) => {
            if effective_count(params.count.as_ref(), &ctx, state) == 0 {
                Precondition::fail(SkipReason::ZeroCount)
            } else {
                hand_check(state.hand_size(ctx.opponent()))
            }
        }
        EffectAction::SwapProtocols(_) if state.lane_count() < 2 => {
            Precondition::fail(SkipReason::NoLanes)
        }
        EffectAction::Choice(params) if params.options.is_empty() => {
            Precondition::fail(SkipReason::NoOptions)
        }
        EffectAction::RearrangeProtocols(_)
        | EffectAction::SwapProtocols(_)
        | EffectAction::ValueModifier(_)
        | EffectAction::PassiveRule(_)
        | EffectAction::Choice(_)
        | EffectAction::Unknown => Precondition::pass(),
    }
}

/// Cards `player` could draw right now.
#[must_use]
pub fn drawable(state: &MatchState, player: PlayerId) -> usize {
    let side = state.player(player);
    if state.config.reshuffle_discard {
        side.drawable()
    } else {
        side.deck.len()
    }
}

fn hand_check(size: u32) -> Precondition {
    if size == 0 {
        Precondition::fail(SkipReason::EmptyHand)
    } else {
        Precondition::pass()
    }
}

fn check_flip(state: &MatchState, ctx: &EffectContext<'_>, params: &FlipParams) -> Precondition {
    if params.target_self {
        return Precondition::pass();
    }
    if !params.all && effective_count(params.count.as_ref(), ctx, state) == 0 {
        return Precondition::fail(SkipReason::ZeroCount);
    }
    let pick = BoardPick::new(BoardPurpose::Flip, params.filter, params.scope);
    Precondition::targets(board_candidates(state, ctx, &pick, &[]).len())
}

fn check_shift(state: &MatchState, ctx: &EffectContext<'_>, params: &ShiftParams) -> Precondition {
    if params.target_self {
        return Precondition::pass();
    }
    let pick = BoardPick::new(BoardPurpose::Shift, params.filter, params.scope)
        .with_destination(params.destination);
    Precondition::targets(board_candidates(state, ctx, &pick, &[]).len())
}

fn check_delete(state: &MatchState, ctx: &EffectContext<'_>, params: &DeleteParams) -> Precondition {
    if params.target_self {
        return Precondition::pass();
    }
    if !params.all && !params.lane_wide && effective_count(params.count.as_ref(), ctx, state) == 0 {
        return Precondition::fail(SkipReason::ZeroCount);
    }
    // Lane-wide deletes are checked lane by lane; the union is the same set.
    let pick = BoardPick::new(BoardPurpose::Delete, params.filter, params.scope);
    Precondition::targets(board_candidates(state, ctx, &pick, &[]).len())
}

fn check_return(state: &MatchState, ctx: &EffectContext<'_>, params: &ReturnParams) -> Precondition {
    if params.target_self {
        return Precondition::pass();
    }
    if !params.all && effective_count(params.count.as_ref(), ctx, state) == 0 {
        return Precondition::fail(SkipReason::ZeroCount);
    }
    let pick = BoardPick::new(BoardPurpose::Return, params.filter, params.scope);
    Precondition::targets(board_candidates(state, ctx, &pick, &[]).len())
}

fn check_play(state: &MatchState, ctx: &EffectContext<'_>, params: &PlayParams) -> Precondition {
    let player = side_player(ctx, params.actor);
    match params.source {
        PlaySource::Hand => {
            let hand = &state.player(player).hand;
            if hand.is_empty() {
                return Precondition::fail(SkipReason::EmptyHand);
            }
            let playable = hand.iter().any(|card| {
                !play_lanes(state, ctx.lane(), player, params.face_down, params.destination, Some(card))
                    .is_empty()
            });
            if playable {
                Precondition::pass()
            } else {
                Precondition::fail(SkipReason::NoLanes)
            }
        }
        PlaySource::Deck => {
            let lanes = play_lanes(state, ctx.lane(), player, params.face_down, params.destination, None);
            if drawable(state, player) == 0 {
                Precondition::fail(SkipReason::EmptyDeck)
            } else if lanes.is_empty() {
                Precondition::fail(SkipReason::NoLanes)
            } else {
                Precondition::pass()
            }
        }
    }
}
