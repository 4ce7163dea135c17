//! Value modifiers and passive rules.
//!
//! Neither is executed like a normal effect. They are read straight off the
//! board: every face-up card whose effect box is active contributes its
//! modifiers and rules for as long as it stays that way. Lane totals are
//! recomputed by [`recalculate`] after every executor step.
//!
//! Ownership in modifiers is relative to the card carrying them: `own`
//! means that card's owner, `opponent` the other side. `source_lane` scope
//! means the lane index the carrying card sits in, on whichever sides the
//! owner filter selects.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::EffectAction;
use super::targeting::{FaceFilter, OwnerFilter};
use crate::core::{CardId, CardLocation, MatchState, PlayerId};

/// Which lanes a modifier reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierScope {
    #[default]
    SourceLane,
    AllLanes,
}

/// Changes to card or lane values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueModifier {
    /// Face-down cards count as `value` instead of the configured default.
    FaceDownValue {
        value: i32,
        #[serde(default)]
        owner: OwnerFilter,
        #[serde(default)]
        scope: ModifierScope,
    },
    /// Lane total changes by `amount` for every matching card in the lane.
    AddPerCard {
        amount: i32,
        #[serde(default)]
        face_state: FaceFilter,
        #[serde(default)]
        owner: OwnerFilter,
        #[serde(default)]
        scope: ModifierScope,
    },
    /// Lane total changes by `amount`.
    AddToTotal {
        amount: i32,
        #[serde(default)]
        owner: OwnerFilter,
        #[serde(default)]
        scope: ModifierScope,
    },
}

/// An action a card can be protected from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedAction {
    Flip,
    Shift,
    Delete,
    Return,
}

/// Standing rules a card imposes while active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassiveRule {
    /// Matching cards cannot be targeted by these actions.
    Protect {
        actions: SmallVec<[ProtectedAction; 4]>,
        #[serde(default)]
        owner: OwnerFilter,
        #[serde(default)]
        scope: ModifierScope,
    },
    /// Matching players cannot play cards face down into these lanes.
    BlockFaceDownPlay {
        #[serde(default)]
        owner: OwnerFilter,
        #[serde(default)]
        scope: ModifierScope,
    },
    /// On-play effects of matching cards do not trigger.
    SuppressOnPlay {
        #[serde(default)]
        owner: OwnerFilter,
        #[serde(default)]
        scope: ModifierScope,
    },
}

/// Check if a modifier carried by the card at `source` reaches lane `lane`
/// on `side`.
fn reaches(source: &CardLocation, owner: OwnerFilter, scope: ModifierScope, side: PlayerId, lane: usize) -> bool {
    owner.matches(side, source.owner)
        && match scope {
            ModifierScope::SourceLane => lane == source.lane,
            ModifierScope::AllLanes => true,
        }
}

/// Every active value modifier with the location of its card.
fn active_modifiers(state: &MatchState) -> Vec<(CardLocation, ValueModifier)> {
    let mut found = Vec::new();
    for (loc, card) in state.board() {
        let uncovered = state.is_uncovered(&loc);
        for (_, def) in card.active_effects(uncovered) {
            if let EffectAction::ValueModifier(params) = &def.params {
                found.push((loc, params.modifier));
            }
        }
    }
    found
}

/// Every active passive rule with the location of its card.
fn active_rules(state: &MatchState) -> Vec<(CardLocation, PassiveRule)> {
    let mut found = Vec::new();
    for (loc, card) in state.board() {
        let uncovered = state.is_uncovered(&loc);
        for (_, def) in card.active_effects(uncovered) {
            if let EffectAction::PassiveRule(params) = &def.params {
                found.push((loc, params.rule.clone()));
            }
        }
    }
    found
}

/// What a face-down card counts as in `lane` on `side`: the highest active
/// override, or the configured default.
#[must_use]
pub fn face_down_value_at(state: &MatchState, side: PlayerId, lane: usize) -> i32 {
    active_modifiers(state)
        .into_iter()
        .filter_map(|(source, modifier)| match modifier {
            ValueModifier::FaceDownValue { value, owner, scope }
                if reaches(&source, owner, scope, side, lane) =>
            {
                Some(value)
            }
            _ => None,
        })
        .max()
        .unwrap_or(state.config.face_down_value)
}

/// A board card's value including active modifiers, or `None` if the card
/// is not on the board.
#[must_use]
pub fn card_effective_value(state: &MatchState, card: CardId) -> Option<i32> {
    let location = state.locate(card)?;
    let card = state.card_at(&location)?;
    Some(if card.face_up {
        card.value
    } else {
        face_down_value_at(state, location.owner, location.lane)
    })
}

/// Total value of one lane including modifiers.
#[must_use]
pub fn lane_total(state: &MatchState, side: PlayerId, lane: usize) -> i32 {
    let modifiers = active_modifiers(state);
    lane_total_with(state, &modifiers, side, lane)
}

fn lane_total_with(
    state: &MatchState,
    modifiers: &[(CardLocation, ValueModifier)],
    side: PlayerId,
    lane: usize,
) -> i32 {
    let cards = &state.lane(side, lane).cards;
    let face_down = face_down_value_at(state, side, lane);
    let mut total: i32 = cards
        .iter()
        .map(|card| if card.face_up { card.value } else { face_down })
        .sum();

    for (source, modifier) in modifiers {
        match *modifier {
            ValueModifier::AddPerCard {
                amount,
                face_state,
                owner,
                scope,
            } if reaches(source, owner, scope, side, lane) => {
                let matching = cards.iter().filter(|c| face_state.matches(c.face_up)).count();
                total += amount * matching as i32;
            }
            ValueModifier::AddToTotal { amount, owner, scope }
                if reaches(source, owner, scope, side, lane) =>
            {
                total += amount;
            }
            _ => {}
        }
    }
    total
}

/// Recompute every lane's cached value.
pub fn recalculate(state: &mut MatchState) {
    let modifiers = active_modifiers(state);
    let lane_count = state.lane_count();
    let totals: Vec<(PlayerId, usize, i32)> = PlayerId::all()
        .flat_map(|side| (0..lane_count).map(move |lane| (side, lane)))
        .map(|(side, lane)| (side, lane, lane_total_with(state, &modifiers, side, lane)))
        .collect();
    for (side, lane, total) in totals {
        state.lane_mut(side, lane).value = total;
    }
}

/// Check if the card at `location` is protected from `action`.
#[must_use]
pub fn is_protected(state: &MatchState, location: &CardLocation, action: ProtectedAction) -> bool {
    active_rules(state).iter().any(|(source, rule)| match rule {
        PassiveRule::Protect { actions, owner, scope } => {
            actions.contains(&action) && reaches(source, *owner, *scope, location.owner, location.lane)
        }
        _ => false,
    })
}

/// Check if `player` is barred from playing face down into `lane`.
#[must_use]
pub fn face_down_play_blocked(state: &MatchState, player: PlayerId, lane: usize) -> bool {
    active_rules(state).iter().any(|(source, rule)| match rule {
        PassiveRule::BlockFaceDownPlay { owner, scope } => reaches(source, *owner, *scope, player, lane),
        _ => false,
    })
}

/// Check if on-play effects of `player`'s cards in `lane` are suppressed.
#[must_use]
pub fn on_play_suppressed(state: &MatchState, player: PlayerId, lane: usize) -> bool {
    active_rules(state).iter().any(|(source, rule)| match rule {
        PassiveRule::SuppressOnPlay { owner, scope } => reaches(source, *owner, *scope, player, lane),
        _ => false,
    })
}
