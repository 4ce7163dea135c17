//! Reveal and give: information and hand transfers.
//!
//! Revealing marks cards as `revealed`; the flag is cleared whenever a card
//! changes zone or is flipped. Giving moves chosen cards from the owner's
//! hand to the opponent's.

use crate::chain::{BoardPurpose, HandPurpose, PromptKind};
use crate::core::{CardId, MatchState, PlayerId};
use crate::effects::count::effective_count;
use crate::effects::{EffectContext, EffectOutcome, GiveParams, RevealParams, RevealSource};
use smallvec::SmallVec;

use super::{continue_pick, BoardPick};

#[must_use]
pub fn execute_reveal(params: &RevealParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    match &params.source {
        RevealSource::OwnHand => {
            let hand = state.hand_size(ctx.owner());
            let count = effective_count(params.count.as_ref(), ctx, &state).min(hand);
            if count == 0 {
                state.log(Some(ctx.owner()), Some(ctx.source_card()), "Reveal: nothing to reveal");
                return EffectOutcome::noop(state);
            }
            let prompt = ctx.prompt(PromptKind::SelectHandCards {
                purpose: HandPurpose::Reveal,
                min: count,
                max: count,
            });
            EffectOutcome::prompt(state, prompt)
        }
        RevealSource::OpponentHand => {
            let opponent = ctx.opponent();
            let cards: Vec<CardId> = state.player(opponent).hand.iter().map(|c| c.id).collect();
            on_hand_cards(ctx, state, opponent, &cards)
        }
        RevealSource::FaceDownCard { filter } => {
            let count = effective_count(params.count.as_ref(), ctx, &state);
            let pick = BoardPick::new(BoardPurpose::Reveal, *filter, Default::default());
            continue_pick(ctx, EffectOutcome::noop(state), &pick, count, SmallVec::new())
        }
    }
}

/// Reveal one face-down board card.
#[must_use]
pub fn on_board_card(ctx: &EffectContext<'_>, mut state: MatchState, card: CardId) -> EffectOutcome {
    let mut value = None;
    let found = state.update_board_card(card, |c| {
        c.revealed = true;
        value = Some(c.value);
    });
    if !found {
        tracing::warn!(%card, "reveal target left the board");
        return EffectOutcome::noop(state);
    }
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("reveals {card} (value {})", value.unwrap_or_default()),
    );
    EffectOutcome::done(state)
}

/// Reveal cards in `holder`'s hand.
#[must_use]
pub fn on_hand_cards(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    holder: PlayerId,
    cards: &[CardId],
) -> EffectOutcome {
    let mut revealed = 0;
    for card in state.player_mut(holder).hand.iter_mut() {
        if cards.contains(&card.id) {
            card.revealed = true;
            revealed += 1;
        }
    }
    if revealed == 0 {
        state.log(Some(holder), Some(ctx.source_card()), "Reveal: nothing to reveal");
        return EffectOutcome::noop(state);
    }
    state.log(Some(holder), Some(ctx.source_card()), format!("reveals {revealed} cards from hand"));
    EffectOutcome::done(state)
}

#[must_use]
pub fn execute_give(params: &GiveParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    let hand = state.hand_size(ctx.owner());
    let count = effective_count(params.count.as_ref(), ctx, &state).min(hand);
    if count == 0 {
        state.log(Some(ctx.owner()), Some(ctx.source_card()), "Give: no cards in hand");
        return EffectOutcome::noop(state);
    }
    let prompt = ctx.prompt(PromptKind::SelectHandCards {
        purpose: HandPurpose::Give,
        min: count,
        max: count,
    });
    EffectOutcome::prompt(state, prompt)
}

/// Move chosen cards from the owner's hand to the opponent's.
#[must_use]
pub fn on_give(ctx: &EffectContext<'_>, mut state: MatchState, cards: &[CardId]) -> EffectOutcome {
    let (owner, opponent) = (ctx.owner(), ctx.opponent());
    let mut given = 0;
    for &id in cards {
        let Some(mut card) = state.take_from_hand(owner, id) else {
            tracing::warn!(%id, %owner, "give target not in hand");
            continue;
        };
        card.revealed = false;
        state.player_mut(opponent).hand.push_back(card);
        given += 1;
    }
    if given == 0 {
        return EffectOutcome::noop(state);
    }
    state.log(Some(owner), Some(ctx.source_card()), format!("gives {given} cards to {opponent}"));
    EffectOutcome::done(state)
}
