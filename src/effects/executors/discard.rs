//! Discard cards from hand.
//!
//! When the discarding player holds no more cards than required, the whole
//! hand goes without a prompt, unless the effect is optional: a "may" discard
//! always asks so the player can decline. Either way the number discarded and
//! the hand size beforehand are recorded for follow-up effects.

use crate::chain::{HandPurpose, PromptKind};
use crate::core::{CardId, MatchState, PlayerId};
use crate::effects::count::effective_count;
use crate::effects::{ContextData, DiscardParams, EffectContext, EffectOutcome};
use crate::triggers::GameEvent;

use super::side_player;

#[must_use]
pub fn execute(params: &DiscardParams, ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    let actor = side_player(ctx, params.actor);
    let hand_size = state.hand_size(actor);

    if params.all {
        return discard_hand(ctx, state, actor);
    }
    let count = effective_count(params.count.as_ref(), ctx, &state);
    if count == 0 || hand_size == 0 {
        return EffectOutcome::noop(state).with_data(ContextData {
            discarded_count: Some(0),
            previous_hand_size: Some(hand_size),
            ..ContextData::default()
        });
    }
    if !params.up_to && !ctx.optional() && hand_size <= count {
        return discard_hand(ctx, state, actor);
    }

    let prompt = ctx.prompt_for(
        actor,
        PromptKind::SelectHandCards {
            purpose: HandPurpose::Discard,
            min: if params.up_to { 0 } else { count.min(hand_size) },
            max: count.min(hand_size),
        },
    );
    EffectOutcome::prompt(state, prompt)
}

fn discard_hand(ctx: &EffectContext<'_>, state: MatchState, actor: PlayerId) -> EffectOutcome {
    let cards: Vec<CardId> = state.player(actor).hand.iter().map(|c| c.id).collect();
    on_cards(ctx, state, actor, &cards)
}

/// Discard specific cards from `actor`'s hand.
#[must_use]
pub fn on_cards(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    actor: PlayerId,
    cards: &[CardId],
) -> EffectOutcome {
    let previous = state.hand_size(actor);
    let mut discarded = 0;
    for &id in cards {
        if let Some(card) = state.take_from_hand(actor, id) {
            state.discard_card(actor, card);
            discarded += 1;
        } else {
            tracing::warn!(%id, %actor, "discard target not in hand");
        }
    }

    let data = ContextData {
        discarded_count: Some(discarded),
        previous_hand_size: Some(previous),
        ..ContextData::default()
    };
    if discarded == 0 {
        return EffectOutcome::noop(state).with_data(data);
    }
    let plural = if discarded == 1 { "card" } else { "cards" };
    state.log(Some(actor), Some(ctx.source_card()), format!("discards {discarded} {plural}"));
    EffectOutcome::done(state)
        .with_event(GameEvent::CardsDiscarded {
            player: actor,
            count: discarded,
        })
        .with_data(data)
}
