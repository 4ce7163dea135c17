//! Return cards from the board to their owner's hand.

use smallvec::SmallVec;

use crate::chain::BoardPurpose;
use crate::core::{CardId, MatchState};
use crate::effects::count::effective_count;
use crate::effects::{modifiers, ContextData, EffectContext, EffectOutcome, ReturnParams};
use crate::triggers::GameEvent;

use super::{apply_all, continue_pick, stale_source, BoardPick};

#[must_use]
pub fn execute(params: &ReturnParams, ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    if params.target_self {
        if !state.is_on_board(ctx.source_card()) {
            return stale_source(ctx, state);
        }
        return on_card(ctx, state, ctx.source_card());
    }

    let pick = BoardPick::new(BoardPurpose::Return, params.filter, params.scope);
    if params.all {
        return apply_all(ctx, state, &pick);
    }
    let count = effective_count(params.count.as_ref(), ctx, &state);
    continue_pick(ctx, EffectOutcome::noop(state), &pick, count, SmallVec::new())
}

/// Return one board card.
#[must_use]
pub fn on_card(ctx: &EffectContext<'_>, mut state: MatchState, card: CardId) -> EffectOutcome {
    let value = modifiers::card_effective_value(&state, card).unwrap_or(0);
    let Some((location, mut removed)) = state.take_from_board(card) else {
        tracing::warn!(%card, "return target left the board");
        state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("Return: {card} is gone"));
        return EffectOutcome::noop(state);
    };
    removed.reset_visibility();
    state.player_mut(location.owner).hand.push_back(removed);
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("returns {card} to {}'s hand", location.owner),
    );

    EffectOutcome::done(state)
        .with_event(GameEvent::CardReturned {
            card,
            owner: location.owner,
        })
        .with_data(ContextData::default().with_reference(card, value))
}
