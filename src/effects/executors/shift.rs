//! Shift a card to another lane on its owner's side.
//!
//! Two steps: pick the card, then pick the lane. The lane step is skipped
//! when the destination is fixed (the source card's lane).

use smallvec::SmallVec;

use crate::chain::{BoardPurpose, PromptKind};
use crate::core::{CardId, MatchState};
use crate::effects::{
    modifiers, ContextData, EffectContext, EffectOutcome, ShiftDestination, ShiftParams,
};
use crate::triggers::GameEvent;

use super::{continue_pick, shift_lanes, stale_source, BoardPick};

#[must_use]
pub fn execute(params: &ShiftParams, ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    if params.target_self {
        if !state.is_on_board(ctx.source_card()) {
            return stale_source(ctx, state);
        }
        return on_card(ctx, state, ctx.source_card(), params.destination);
    }

    let pick = BoardPick::new(BoardPurpose::Shift, params.filter, params.scope)
        .with_destination(params.destination);
    continue_pick(ctx, EffectOutcome::noop(state), &pick, 1, SmallVec::new())
}

/// A card to shift has been chosen; pick or apply its destination.
#[must_use]
pub fn on_card(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    card: CardId,
    destination: ShiftDestination,
) -> EffectOutcome {
    let Some(location) = state.locate(card) else {
        tracing::warn!(%card, "shift target left the board");
        state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("Shift: {card} is gone"));
        return EffectOutcome::noop(state);
    };
    let lanes = shift_lanes(&state, &location, destination, ctx.lane());
    match lanes.as_slice() {
        [] => {
            state.log(Some(ctx.owner()), Some(ctx.source_card()), "Shift: no lane to shift to");
            EffectOutcome::noop(state)
        }
        [only] if destination == ShiftDestination::SourceLane => on_lane(ctx, state, card, *only),
        _ => {
            let prompt = ctx.prompt(PromptKind::SelectShiftLane {
                card,
                candidates: lanes,
            });
            EffectOutcome::prompt(state, prompt)
        }
    }
}

/// Move `card` to lane `to` on its owner's side.
#[must_use]
pub fn on_lane(ctx: &EffectContext<'_>, mut state: MatchState, card: CardId, to: usize) -> EffectOutcome {
    let Some((from, moved)) = state.take_from_board(card) else {
        tracing::warn!(%card, "shift target left the board");
        return EffectOutcome::noop(state);
    };
    let mut events: SmallVec<[GameEvent; 4]> = SmallVec::new();
    if let Some(covered) = state.place_on_lane(from.owner, to, moved) {
        events.push(GameEvent::CardCovered {
            card: covered,
            owner: from.owner,
            lane: to,
        });
    }
    events.push(GameEvent::CardShifted {
        card,
        owner: from.owner,
        from: from.lane,
        to,
        by: ctx.owner(),
    });
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("shifts {card} from lane {} to lane {to}", from.lane),
    );

    let value = modifiers::card_effective_value(&state, card).unwrap_or(0);
    EffectOutcome::done(state)
        .with_events(events)
        .with_data(ContextData::default().with_reference(card, value))
}
