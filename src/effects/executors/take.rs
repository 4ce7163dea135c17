//! Take cards from the opponent's hand.
//!
//! Random takes draw on the match RNG so replays stay deterministic. A
//! chosen take picks one card at a time from the opponent's hand.

use crate::chain::PromptKind;
use crate::core::{CardId, MatchState};
use crate::effects::count::effective_count;
use crate::effects::{EffectContext, EffectOutcome, TakeParams};

#[must_use]
pub fn execute(params: &TakeParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    let opponent = ctx.opponent();
    let count = effective_count(params.count.as_ref(), ctx, &state).min(state.hand_size(opponent));
    if count == 0 {
        state.log(Some(ctx.owner()), Some(ctx.source_card()), "Take: opponent has no cards");
        return EffectOutcome::noop(state);
    }

    if !params.random {
        let prompt = ctx.prompt(PromptKind::SelectOpponentHandCard { remaining: count });
        return EffectOutcome::prompt(state, prompt);
    }

    let mut taken = 0;
    for _ in 0..count {
        let len = state.player(opponent).hand.len();
        if len == 0 {
            break;
        }
        let index = state.rng.gen_range_usize(0..len);
        let id = state.player(opponent).hand[index].id;
        if move_card(ctx, &mut state, id) {
            taken += 1;
        }
    }
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("takes {taken} random cards from {opponent}"),
    );
    EffectOutcome::done(state)
}

/// One card was chosen from the opponent's hand; ask again while picks remain.
#[must_use]
pub fn on_card(ctx: &EffectContext<'_>, mut state: MatchState, card: CardId, remaining: u32) -> EffectOutcome {
    if !move_card(ctx, &mut state, card) {
        tracing::warn!(%card, "take target not in opponent's hand");
        return EffectOutcome::noop(state);
    }
    state.log(Some(ctx.owner()), Some(ctx.source_card()), format!("takes {card}"));

    let remaining = remaining.saturating_sub(1);
    if remaining > 0 && state.hand_size(ctx.opponent()) > 0 {
        let prompt = ctx.prompt(PromptKind::SelectOpponentHandCard { remaining });
        return EffectOutcome::prompt(state, prompt).executed(true);
    }
    EffectOutcome::done(state)
}

fn move_card(ctx: &EffectContext<'_>, state: &mut MatchState, card: CardId) -> bool {
    let Some(mut taken) = state.take_from_hand(ctx.opponent(), card) else {
        return false;
    };
    taken.revealed = false;
    state.player_mut(ctx.owner()).hand.push_back(taken);
    true
}
