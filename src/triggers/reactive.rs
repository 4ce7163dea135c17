//! Turning events into chain entries.
//!
//! Dispatch only looks at each definition's `trigger` field:
//!
//! - A card played face up, or flipped face up, queues its active `on_play`
//!   effects (unless a passive rule suppresses them in that lane).
//! - A face-up card that gets covered queues its `on_cover` effects. The
//!   card is already covered by then, so the position rule is not applied.
//! - Face-up watchers on the board queue their `after_*` effects when an
//!   event matches, at most once per definition for a batch of events.
//!
//! Entries come out in event order, and within one event in seat order
//! (first seat's lanes 0..n, then the second seat's).

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, EffectPosition};
use crate::chain::ChainEntry;
use crate::core::{CardId, CardLocation, MatchState, PlayerId};
use crate::effects::{modifiers, EffectDefinition, EffectTrigger};

use super::GameEvent;

/// Turn phases with their own triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    End,
}

impl Phase {
    #[must_use]
    pub const fn trigger(self) -> EffectTrigger {
        match self {
            Self::Start => EffectTrigger::Start,
            Self::End => EffectTrigger::End,
        }
    }
}

/// Entries for every trigger the events set off.
#[must_use]
pub fn collect_reactive(state: &MatchState, events: &[GameEvent]) -> Vec<ChainEntry> {
    let mut entries = Vec::new();
    let mut fired: FxHashSet<(CardId, EffectPosition, usize)> = FxHashSet::default();

    for event in events {
        match *event {
            GameEvent::CardPlayed { card, face_up: true, .. }
            | GameEvent::CardFlipped { card, face_up: true, .. } => {
                on_play(state, card, &mut entries);
            }
            GameEvent::CardCovered { card, .. } => on_cover(state, card, &mut entries),
            _ => {}
        }
        watchers(state, event, &mut fired, &mut entries);
    }

    if !entries.is_empty() {
        tracing::debug!(count = entries.len(), events = events.len(), "reactive effects collected");
    }
    entries
}

/// Start or end effects of `player`'s active cards.
#[must_use]
pub fn collect_phase_effects(state: &MatchState, player: PlayerId, phase: Phase) -> Vec<ChainEntry> {
    let trigger = phase.trigger();
    state
        .board()
        .filter(|(loc, card)| loc.owner == player && card.face_up)
        .flat_map(|(loc, card)| {
            let uncovered = state.is_uncovered(&loc);
            card.active_effects(uncovered)
                .filter(move |(_, def)| def.trigger == trigger)
                .map(move |(_, def)| entry_for(def, &loc))
        })
        .collect()
}

fn entry_for(def: &EffectDefinition, loc: &CardLocation) -> ChainEntry {
    ChainEntry::new(def.clone(), loc.card, loc.lane, loc.owner)
}

fn on_play(state: &MatchState, card: CardId, entries: &mut Vec<ChainEntry>) {
    let Some(loc) = state.locate(card) else {
        return;
    };
    let Some(found) = state.card_at(&loc).filter(|c| c.face_up) else {
        return;
    };
    if modifiers::on_play_suppressed(state, loc.owner, loc.lane) {
        tracing::trace!(%card, lane = loc.lane, "on-play effects suppressed");
        return;
    }
    let uncovered = state.is_uncovered(&loc);
    entries.extend(
        found
            .active_effects(uncovered)
            .filter(|(_, def)| def.trigger == EffectTrigger::OnPlay)
            .map(|(_, def)| entry_for(def, &loc)),
    );
}

fn on_cover(state: &MatchState, card: CardId, entries: &mut Vec<ChainEntry>) {
    let Some(loc) = state.locate(card) else {
        return;
    };
    let Some(found) = state.card_at(&loc).filter(|c| c.face_up) else {
        return;
    };
    entries.extend(
        found
            .effects
            .iter()
            .filter(|(_, def)| def.trigger == EffectTrigger::OnCover)
            .map(|(_, def)| entry_for(def, &loc)),
    );
}

/// Does `trigger` on a card owned by `watcher` react to `event`?
fn reacts(trigger: EffectTrigger, watcher: PlayerId, event: &GameEvent) -> bool {
    let mine = event.actor() == watcher;
    match (trigger, event) {
        (EffectTrigger::AfterDraw, GameEvent::CardsDrawn { .. })
        | (EffectTrigger::AfterDiscard, GameEvent::CardsDiscarded { .. })
        | (EffectTrigger::AfterDelete, GameEvent::CardDeleted { .. })
        | (EffectTrigger::AfterFlip, GameEvent::CardFlipped { .. })
        | (EffectTrigger::AfterShift, GameEvent::CardShifted { .. })
        | (EffectTrigger::AfterClearCache, GameEvent::CacheCleared { .. }) => mine,
        (EffectTrigger::AfterOpponentDraw, GameEvent::CardsDrawn { .. })
        | (EffectTrigger::AfterOpponentDiscard, GameEvent::CardsDiscarded { .. })
        | (EffectTrigger::AfterOpponentPlay, GameEvent::CardPlayed { .. }) => !mine,
        _ => false,
    }
}

fn watchers(
    state: &MatchState,
    event: &GameEvent,
    fired: &mut FxHashSet<(CardId, EffectPosition, usize)>,
    entries: &mut Vec<ChainEntry>,
) {
    for (loc, card) in state.board().filter(|(_, card)| card.face_up) {
        let uncovered = state.is_uncovered(&loc);
        for (position, index, def) in indexed(card, uncovered) {
            if !def.trigger.is_reactive() || !reacts(def.trigger, loc.owner, event) {
                continue;
            }
            if fired.insert((card.id, position, index)) {
                entries.push(entry_for(def, &loc));
            }
        }
    }
}

/// Active definitions with their box and index within the box.
fn indexed(
    card: &Card,
    uncovered: bool,
) -> impl Iterator<Item = (EffectPosition, usize, &EffectDefinition)> {
    EffectPosition::ALL
        .into_iter()
        .filter(move |pos| pos.is_active(card.face_up, uncovered))
        .flat_map(move |pos| {
            card.effects
                .at(pos)
                .iter()
                .enumerate()
                .map(move |(index, def)| (pos, index, def))
        })
}
