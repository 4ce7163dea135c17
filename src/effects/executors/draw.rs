//! Draw cards.

use crate::core::MatchState;
use crate::effects::count::effective_count;
use crate::effects::{DrawParams, EffectContext, EffectOutcome};
use crate::triggers::GameEvent;

use super::side_player;

/// Draw a resolved number of cards for the targeted side.
#[must_use]
pub fn execute(params: &DrawParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    let count = effective_count(params.count.as_ref(), ctx, &state);
    let player = side_player(ctx, params.target);
    let drawn = state.draw(player, count);

    if drawn == 0 {
        state.log(Some(player), Some(ctx.source_card()), "Draw: no cards to draw");
        return EffectOutcome::noop(state);
    }
    let plural = if drawn == 1 { "card" } else { "cards" };
    state.log(Some(player), Some(ctx.source_card()), format!("draws {drawn} {plural}"));
    tracing::debug!(%player, drawn, requested = count, "draw");
    EffectOutcome::done(state).with_event(GameEvent::CardsDrawn {
        player,
        count: drawn,
    })
}
