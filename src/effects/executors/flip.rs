//! Flip cards face up or face down.
//!
//! A card flipped face up fires its on-play effects through the reactive
//! collector, exactly as if it had been played face up.

use smallvec::SmallVec;

use crate::chain::BoardPurpose;
use crate::core::{CardId, MatchState};
use crate::effects::count::effective_count;
use crate::effects::{modifiers, ContextData, EffectContext, EffectOutcome, FlipParams};
use crate::triggers::GameEvent;

use super::{apply_all, continue_pick, stale_source, BoardPick};

#[must_use]
pub fn execute(params: &FlipParams, ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    if params.target_self {
        if !state.is_on_board(ctx.source_card()) {
            return stale_source(ctx, state);
        }
        return on_card(ctx, state, ctx.source_card());
    }

    let pick = BoardPick::new(BoardPurpose::Flip, params.filter, params.scope);
    if params.all {
        return apply_all(ctx, state, &pick);
    }
    let count = effective_count(params.count.as_ref(), ctx, &state);
    continue_pick(ctx, EffectOutcome::noop(state), &pick, count, SmallVec::new())
}

/// Flip one board card.
#[must_use]
pub fn on_card(ctx: &EffectContext<'_>, mut state: MatchState, card: CardId) -> EffectOutcome {
    let Some(location) = state.locate(card) else {
        tracing::warn!(%card, "flip target left the board");
        state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("Flip: {card} is gone"));
        return EffectOutcome::noop(state);
    };

    let mut face_up = false;
    state.update_board_card(card, |c| {
        c.face_up = !c.face_up;
        c.revealed = false;
        face_up = c.face_up;
    });
    let side = if face_up { "face up" } else { "face down" };
    state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("flips {card} {side}"));

    let value = modifiers::card_effective_value(&state, card).unwrap_or(0);
    EffectOutcome::done(state)
        .with_event(GameEvent::CardFlipped {
            card,
            owner: location.owner,
            face_up,
            by: ctx.owner(),
        })
        .with_data(ContextData::default().with_reference(card, value))
}
