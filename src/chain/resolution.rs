//! Applying a caller's answer to the outstanding prompt.
//!
//! Every answer is re-validated against the current state before anything
//! changes: candidate lists are recomputed, hand cards must still be in
//! hand, and so on. A validated choice is routed to the `on_*` step of the
//! executor that asked, which may in turn ask again (multi-pick flips, the
//! lane step of a shift or play).

use smallvec::SmallVec;

use crate::core::{CardId, EngineError, MatchState};
use crate::effects::executors::{
    self, board_candidates, choice, delete, discard, play, play_lanes, protocols, reveal, shift, take,
    BoardPick,
};
use crate::effects::{EffectContext, EffectOutcome};

use super::{ActionRequired, ChainEntry, Choice, HandPurpose, LanePurpose, PromptKind};

/// Label used in validation errors.
fn expected(kind: &PromptKind) -> &'static str {
    match kind {
        PromptKind::SelectBoardCard { purpose, .. } => purpose.label(),
        PromptKind::SelectHandCards { purpose, .. } => purpose.label(),
        PromptKind::SelectShiftLane { .. } => "lane to shift to",
        PromptKind::SelectLane { .. } => "lane",
        PromptKind::SelectPlayLane { .. } => "lane to play into",
        PromptKind::SelectOpponentHandCard { .. } => "card to take",
        PromptKind::RearrangeProtocols { .. } => "protocol order",
        PromptKind::SwapProtocols { .. } => "protocols to swap",
        PromptKind::ChooseOption { .. } => "option",
    }
}

/// Check `choice` against `prompt` and the current state.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSelection`] when the choice has the wrong
/// shape for the prompt or names something that is not a legal answer.
pub fn validate(
    state: &MatchState,
    prompt: &ActionRequired,
    entry: &ChainEntry,
    choice: &Choice,
) -> Result<(), EngineError> {
    let label = expected(&prompt.kind);
    let ctx = EffectContext::new(entry);

    if *choice == Choice::Skip {
        let stop_early = matches!(&prompt.kind, PromptKind::SelectBoardCard { chosen, .. } if !chosen.is_empty());
        return if prompt.can_skip() || stop_early {
            Ok(())
        } else {
            Err(EngineError::invalid(label, "this prompt cannot be skipped"))
        };
    }

    match (&prompt.kind, choice) {
        (PromptKind::SelectBoardCard { chosen, .. }, Choice::Card(card)) => {
            let pick = BoardPick::from_prompt(&prompt.kind)
                .ok_or_else(|| EngineError::invalid(label, "not a board prompt"))?;
            if board_candidates(state, &ctx, &pick, chosen)
                .iter()
                .any(|loc| loc.card == *card)
            {
                Ok(())
            } else {
                Err(EngineError::invalid(label, format!("{card} is not a legal target")))
            }
        }
        (PromptKind::SelectShiftLane { card, candidates }, Choice::Lane(lane)) => {
            if !state.is_on_board(*card) {
                return Err(EngineError::UnknownCard(*card));
            }
            lane_in(label, candidates, *lane)
        }
        (PromptKind::SelectLane { candidates, .. }, Choice::Lane(lane)) => lane_in(label, candidates, *lane),
        (PromptKind::SelectPlayLane { card, candidates, .. }, Choice::Lane(lane)) => {
            if !state.in_hand(prompt.actor, *card) {
                return Err(EngineError::invalid(label, format!("{card} is no longer in hand")));
            }
            lane_in(label, candidates, *lane)
        }
        (PromptKind::SelectHandCards { purpose, min, max }, Choice::Cards(cards)) => {
            validate_hand_cards(state, prompt, &ctx, *purpose, (*min, *max), cards)
        }
        (PromptKind::SelectHandCards { purpose, min, max }, Choice::Card(card)) => {
            validate_hand_cards(state, prompt, &ctx, *purpose, (*min, *max), &[*card])
        }
        (PromptKind::SelectOpponentHandCard { .. }, Choice::Card(card)) => {
            if state.in_hand(prompt.actor.opponent(), *card) {
                Ok(())
            } else {
                Err(EngineError::invalid(label, format!("{card} is not in the opponent's hand")))
            }
        }
        (PromptKind::RearrangeProtocols { target }, Choice::ProtocolOrder(order)) => {
            if protocols::is_permutation(state, *target, order) {
                Ok(())
            } else {
                Err(EngineError::invalid(label, "not a reordering of the current protocols"))
            }
        }
        (PromptKind::SwapProtocols { .. }, Choice::SwapLanes(a, b)) => {
            let lanes = state.lane_count();
            if a != b && *a < lanes && *b < lanes {
                Ok(())
            } else {
                Err(EngineError::invalid(label, format!("cannot swap lanes {a} and {b}")))
            }
        }
        (PromptKind::ChooseOption { options }, Choice::OptionIndex(index)) => {
            if *index < options.len() {
                Ok(())
            } else {
                Err(EngineError::invalid(label, format!("option {index} does not exist")))
            }
        }
        (kind, other) => Err(EngineError::invalid(
            label,
            format!("{other:?} does not answer a {} prompt", kind.name()),
        )),
    }
}

fn lane_in(label: &'static str, candidates: &[usize], lane: usize) -> Result<(), EngineError> {
    if candidates.contains(&lane) {
        Ok(())
    } else {
        Err(EngineError::invalid(label, format!("lane {lane} is not allowed")))
    }
}

fn validate_hand_cards(
    state: &MatchState,
    prompt: &ActionRequired,
    ctx: &EffectContext<'_>,
    purpose: HandPurpose,
    (min, max): (u32, u32),
    cards: &[CardId],
) -> Result<(), EngineError> {
    let label = purpose.label();
    let picked = u32::try_from(cards.len()).unwrap_or(u32::MAX);
    if picked < min || picked > max {
        return Err(EngineError::invalid(
            label,
            format!("picked {picked}, need between {min} and {max}"),
        ));
    }
    for (i, card) in cards.iter().enumerate() {
        if cards[..i].contains(card) {
            return Err(EngineError::invalid(label, format!("{card} picked twice")));
        }
        if !state.in_hand(prompt.actor, *card) {
            return Err(EngineError::invalid(label, format!("{card} is not in hand")));
        }
    }
    if let HandPurpose::Play { face_down, destination } = purpose {
        let hand = &state.player(prompt.actor).hand;
        let playable = cards.iter().all(|id| {
            hand.iter().find(|c| c.id == *id).is_some_and(|card| {
                !play_lanes(state, ctx.lane(), prompt.actor, face_down, destination, Some(card)).is_empty()
            })
        });
        if !playable {
            return Err(EngineError::invalid(label, "no lane can take that card"));
        }
    }
    Ok(())
}

/// Apply an already validated `choice`.
#[must_use]
pub fn apply_choice(
    mut state: MatchState,
    prompt: &ActionRequired,
    entry: &ChainEntry,
    choice: Choice,
) -> EffectOutcome {
    let ctx = EffectContext::new(entry);
    let actor = prompt.actor;

    match (&prompt.kind, choice) {
        (PromptKind::SelectHandCards { purpose: HandPurpose::Discard, .. }, Choice::Skip) => {
            discard::on_cards(&ctx, state, actor, &[])
        }
        (_, Choice::Skip) => {
            state.log(
                Some(actor),
                Some(entry.source_card),
                format!("skips {}", entry.definition.action_name()),
            );
            EffectOutcome::noop(state)
        }
        (PromptKind::SelectBoardCard { remaining, chosen, .. }, Choice::Card(card)) => {
            let Some(pick) = BoardPick::from_prompt(&prompt.kind) else {
                return EffectOutcome::noop(state);
            };
            let outcome = executors::apply_pick(&ctx, state, &pick, card);
            let mut chosen: SmallVec<[CardId; 4]> = chosen.clone();
            chosen.push(card);
            executors::continue_pick(&ctx, outcome, &pick, remaining.saturating_sub(1), chosen)
        }
        (PromptKind::SelectShiftLane { card, .. }, Choice::Lane(lane)) => shift::on_lane(&ctx, state, *card, lane),
        (PromptKind::SelectLane { purpose, .. }, Choice::Lane(lane)) => match *purpose {
            LanePurpose::DeleteAll { filter } => delete::on_lane(&ctx, state, lane, filter),
            LanePurpose::PlayFromDeck { face_down } => play::on_deck_lane(&ctx, state, actor, lane, face_down),
        },
        (PromptKind::SelectPlayLane { card, face_down, .. }, Choice::Lane(lane)) => {
            play::on_play_lane(&ctx, state, actor, *card, lane, *face_down)
        }
        (PromptKind::SelectHandCards { purpose, .. }, choice @ (Choice::Card(_) | Choice::Cards(_))) => {
            let cards = match choice {
                Choice::Card(card) => vec![card],
                Choice::Cards(cards) => cards,
                _ => Vec::new(),
            };
            match *purpose {
                HandPurpose::Discard => discard::on_cards(&ctx, state, actor, &cards),
                HandPurpose::Give => reveal::on_give(&ctx, state, &cards),
                HandPurpose::Reveal => reveal::on_hand_cards(&ctx, state, actor, &cards),
                HandPurpose::Play { face_down, destination } => match cards.first() {
                    Some(&card) => play::on_hand_card(&ctx, state, actor, card, face_down, destination),
                    None => EffectOutcome::noop(state),
                },
            }
        }
        (PromptKind::SelectOpponentHandCard { remaining }, Choice::Card(card)) => {
            take::on_card(&ctx, state, card, *remaining)
        }
        (PromptKind::RearrangeProtocols { target }, Choice::ProtocolOrder(order)) => {
            protocols::on_order(&ctx, state, *target, &order)
        }
        (PromptKind::SwapProtocols { target }, Choice::SwapLanes(a, b)) => {
            protocols::on_swap(&ctx, state, *target, a, b)
        }
        (PromptKind::ChooseOption { options }, Choice::OptionIndex(index)) => {
            choice::on_option(&ctx, state, options, index)
        }
        (kind, other) => {
            tracing::warn!(prompt = kind.name(), choice = ?other, "choice does not match prompt");
            EffectOutcome::noop(state)
        }
    }
}
