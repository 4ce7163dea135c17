//! Delete cards: board to their owner's discard pile.

use smallvec::SmallVec;

use crate::chain::{BoardPurpose, LanePurpose, PromptKind};
use crate::core::{CardId, MatchState};
use crate::effects::count::effective_count;
use crate::effects::{
    modifiers, ContextData, DeleteParams, EffectContext, EffectOutcome, TargetFilter, TargetScope,
};
use crate::triggers::GameEvent;

use super::{apply_all, board_candidates, continue_pick, stale_source, BoardPick};

#[must_use]
pub fn execute(params: &DeleteParams, ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    if params.target_self {
        if !state.is_on_board(ctx.source_card()) {
            return stale_source(ctx, state);
        }
        return on_card(ctx, state, ctx.source_card());
    }

    let pick = BoardPick::new(BoardPurpose::Delete, params.filter, params.scope);
    if params.lane_wide {
        let lanes = target_lanes(&state, ctx, &pick);
        if lanes.is_empty() {
            return EffectOutcome::noop(state);
        }
        let prompt = ctx.prompt(PromptKind::SelectLane {
            purpose: LanePurpose::DeleteAll {
                filter: params.filter,
            },
            candidates: lanes,
        });
        return EffectOutcome::prompt(state, prompt);
    }
    if params.all {
        return apply_all(ctx, state, &pick);
    }
    let count = effective_count(params.count.as_ref(), ctx, &state);
    continue_pick(ctx, EffectOutcome::noop(state), &pick, count, SmallVec::new())
}

/// Lanes holding at least one legal target.
fn target_lanes(state: &MatchState, ctx: &EffectContext<'_>, pick: &BoardPick) -> SmallVec<[usize; 3]> {
    let targets = board_candidates(state, ctx, pick, &[]);
    (0..state.lane_count())
        .filter(|lane| targets.iter().any(|loc| loc.lane == *lane))
        .collect()
}

/// Lanes a lane-wide delete may pick right now.
#[must_use]
pub fn lanes_for(state: &MatchState, ctx: &EffectContext<'_>, filter: TargetFilter) -> SmallVec<[usize; 3]> {
    let pick = BoardPick::new(BoardPurpose::Delete, filter, TargetScope::AnyLane);
    target_lanes(state, ctx, &pick)
}

/// Delete one board card.
#[must_use]
pub fn on_card(ctx: &EffectContext<'_>, mut state: MatchState, card: CardId) -> EffectOutcome {
    let value = modifiers::card_effective_value(&state, card).unwrap_or(0);
    let Some((location, removed)) = state.take_from_board(card) else {
        tracing::warn!(%card, "delete target left the board");
        state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("Delete: {card} is gone"));
        return EffectOutcome::noop(state);
    };
    state.discard_card(location.owner, removed);
    state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("deletes {card}"));

    EffectOutcome::done(state)
        .with_event(GameEvent::CardDeleted {
            card,
            owner: location.owner,
            by: ctx.owner(),
        })
        .with_data(ContextData::default().with_reference(card, value))
}

/// Delete every legal target in one lane, on both sides.
#[must_use]
pub fn on_lane(
    ctx: &EffectContext<'_>,
    state: MatchState,
    lane: usize,
    filter: TargetFilter,
) -> EffectOutcome {
    let pick = BoardPick::new(BoardPurpose::Delete, filter, TargetScope::AnyLane);
    let targets: Vec<CardId> = board_candidates(&state, ctx, &pick, &[])
        .into_iter()
        .filter(|loc| loc.lane == lane)
        .map(|loc| loc.card)
        .collect();

    let mut outcome = EffectOutcome::noop(state);
    for card in targets {
        let step = on_card(ctx, outcome.state, card);
        outcome.events.extend(step.events);
        outcome = EffectOutcome {
            executed: outcome.executed || step.executed,
            events: outcome.events,
            ..step
        };
    }
    outcome
}
