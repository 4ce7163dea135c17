//! Play a card as part of an effect.
//!
//! From hand: pick the card, then the lane (skipped when only one lane is
//! legal). From the deck: the top card goes face down (or up) into the
//! chosen lane, or one into each other lane.
//!
//! A card played from hand with `each_other_lane` is treated like
//! `other_lanes`: one card, any lane but the source's.

use smallvec::SmallVec;

use crate::chain::{HandPurpose, LanePurpose, PromptKind};
use crate::core::{CardId, MatchState, PlayerId};
use crate::effects::{EffectContext, EffectOutcome, PlayDestination, PlayParams, PlaySource};
use crate::triggers::GameEvent;

use super::{place_card, play_lanes, side_player};

#[must_use]
pub fn execute(params: &PlayParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    let actor = side_player(ctx, params.actor);
    match params.source {
        PlaySource::Hand => {
            if state.hand_size(actor) == 0 {
                state.log(Some(actor), Some(ctx.source_card()), "Play: no cards in hand");
                return EffectOutcome::noop(state);
            }
            let prompt = ctx.prompt_for(
                actor,
                PromptKind::SelectHandCards {
                    purpose: HandPurpose::Play {
                        face_down: params.face_down,
                        destination: params.destination,
                    },
                    min: 1,
                    max: 1,
                },
            );
            EffectOutcome::prompt(state, prompt)
        }
        PlaySource::Deck => {
            let lanes = play_lanes(&state, ctx.lane(), actor, params.face_down, params.destination, None);
            match (params.destination, lanes.as_slice()) {
                (_, []) => {
                    state.log(Some(actor), Some(ctx.source_card()), "Play: no lane to play into");
                    EffectOutcome::noop(state)
                }
                (PlayDestination::EachOtherLane, _) => {
                    let mut executed = false;
                    let mut events = SmallVec::<[GameEvent; 4]>::new();
                    for &lane in &lanes {
                        let step = on_deck_lane(ctx, state, actor, lane, params.face_down);
                        executed |= step.executed;
                        events.extend(step.events);
                        state = step.state;
                    }
                    EffectOutcome::noop(state).with_events(events).executed(executed)
                }
                (_, [only]) => on_deck_lane(ctx, state, actor, *only, params.face_down),
                _ => {
                    let prompt = ctx.prompt_for(
                        actor,
                        PromptKind::SelectLane {
                            purpose: LanePurpose::PlayFromDeck {
                                face_down: params.face_down,
                            },
                            candidates: lanes,
                        },
                    );
                    EffectOutcome::prompt(state, prompt)
                }
            }
        }
    }
}

/// A card from hand has been chosen; pick or apply its lane.
#[must_use]
pub fn on_hand_card(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    actor: PlayerId,
    card: CardId,
    face_down: bool,
    destination: PlayDestination,
) -> EffectOutcome {
    let lanes = {
        let Some(in_hand) = state.player(actor).hand.iter().find(|c| c.id == card) else {
            tracing::warn!(%card, %actor, "play target not in hand");
            return EffectOutcome::noop(state);
        };
        play_lanes(&state, ctx.lane(), actor, face_down, destination, Some(in_hand))
    };
    match lanes.as_slice() {
        [] => {
            state.log(Some(actor), Some(ctx.source_card()), "Play: no lane to play into");
            EffectOutcome::noop(state)
        }
        [only] => on_play_lane(ctx, state, actor, card, *only, face_down),
        _ => {
            let prompt = ctx.prompt_for(
                actor,
                PromptKind::SelectPlayLane {
                    card,
                    face_down,
                    candidates: lanes,
                },
            );
            EffectOutcome::prompt(state, prompt)
        }
    }
}

/// Play a card from `actor`'s hand into `lane`.
#[must_use]
pub fn on_play_lane(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    actor: PlayerId,
    card: CardId,
    lane: usize,
    face_down: bool,
) -> EffectOutcome {
    let Some(played) = state.take_from_hand(actor, card) else {
        tracing::warn!(%card, %actor, "play target not in hand");
        return EffectOutcome::noop(state);
    };
    let events = place_card(&mut state, actor, lane, played, !face_down);
    let side = if face_down { "face down" } else { "face up" };
    state.log(Some(actor), Some(ctx.source_card()), format!("plays {card} {side} in lane {lane}"));
    EffectOutcome::done(state).with_events(events)
}

/// Play the top card of `actor`'s deck into `lane`.
#[must_use]
pub fn on_deck_lane(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    actor: PlayerId,
    lane: usize,
    face_down: bool,
) -> EffectOutcome {
    let Some(card) = state.take_top_of_deck(actor) else {
        state.log(Some(actor), Some(ctx.source_card()), "Play: no cards in deck");
        return EffectOutcome::noop(state);
    };
    let id = card.id;
    let events = place_card(&mut state, actor, lane, card, !face_down);
    let side = if face_down { "face down" } else { "face up" };
    state.log(
        Some(actor),
        Some(ctx.source_card()),
        format!("plays {id} from the deck {side} in lane {lane}"),
    );
    EffectOutcome::done(state).with_events(events)
}
