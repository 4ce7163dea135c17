//! Target resolution.
//!
//! Pure queries over a `MatchState` that return the board locations matching
//! a `TargetFilter`.
//!
//! ## Iteration Order
//!
//! Results always come back in seat order: the first seat's lanes 0..n, then
//! the second seat's, card index ascending within a lane. Ties in
//! [`find_extreme_target`] go to the first card seen in that order.
//!
//! ## Face-down Cards
//!
//! For filtering, a face-down card's value is the configured face-down value
//! (2 by default) regardless of what is printed on it. Lane modifiers do not
//! apply here; they only affect totals and dynamic counts.
//!
//! ## Example
//!
//! ```
//! use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
//! use compile_ccg::effects::{find_targets, FaceFilter, TargetFilter};
//!
//! let mut state = MatchState::new(RulesConfig::default(), 7);
//! let mut card = state.new_card("Fire", 5);
//! card.face_up = false;
//! state.place_on_lane(PlayerId::SECOND, 1, card);
//!
//! let filter = TargetFilter::any().with_face_state(FaceFilter::FaceDown);
//! let targets = find_targets(&state, &filter, PlayerId::FIRST, None, None);
//! assert_eq!(targets.len(), 1);
//! assert_eq!(targets[0].lane, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{CardId, CardLocation, MatchState, PlayerId};

/// Whose cards qualify, relative to the acting player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerFilter {
    Own,
    Opponent,
    #[default]
    Any,
}

impl OwnerFilter {
    /// Check if a card owned by `owner` passes, from `actor`'s point of view.
    #[must_use]
    pub fn matches(self, owner: PlayerId, actor: PlayerId) -> bool {
        match self {
            Self::Own => owner == actor,
            Self::Opponent => owner != actor,
            Self::Any => true,
        }
    }
}

/// Covered/uncovered constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFilter {
    Covered,
    /// Last card in its lane.
    #[default]
    Uncovered,
    Any,
}

/// Face-up/face-down constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceFilter {
    FaceUp,
    FaceDown,
    #[default]
    Any,
}

impl FaceFilter {
    #[must_use]
    pub fn matches(self, face_up: bool) -> bool {
        match self {
            Self::FaceUp => face_up,
            Self::FaceDown => !face_up,
            Self::Any => true,
        }
    }
}

/// Value constraint on a card's filter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueConstraint {
    Equals(i32),
    /// Inclusive bounds; a missing bound is open.
    Range {
        #[serde(default)]
        min: Option<i32>,
        #[serde(default)]
        max: Option<i32>,
    },
}

impl ValueConstraint {
    #[must_use]
    pub fn matches(self, value: i32) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::Range { min, max } => {
                min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
            }
        }
    }
}

/// Declarative predicate set for legal targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFilter {
    pub owner: OwnerFilter,
    pub position: PositionFilter,
    pub face_state: FaceFilter,
    pub value: Option<ValueConstraint>,
    pub exclude_self: bool,
}

impl TargetFilter {
    /// Any uncovered card.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Set the owner constraint (builder pattern).
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerFilter) -> Self {
        self.owner = owner;
        self
    }

    /// Set the position constraint (builder pattern).
    #[must_use]
    pub fn with_position(mut self, position: PositionFilter) -> Self {
        self.position = position;
        self
    }

    /// Set the face-state constraint (builder pattern).
    #[must_use]
    pub fn with_face_state(mut self, face_state: FaceFilter) -> Self {
        self.face_state = face_state;
        self
    }

    /// Set the value constraint (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: ValueConstraint) -> Self {
        self.value = Some(value);
        self
    }

    /// Exclude the source card (builder pattern).
    #[must_use]
    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    /// Check one card against every filter field.
    #[must_use]
    pub fn matches(
        &self,
        state: &MatchState,
        location: &CardLocation,
        card: &Card,
        actor: PlayerId,
        source: Option<CardId>,
    ) -> bool {
        if self.exclude_self && source == Some(card.id) {
            return false;
        }
        if !self.owner.matches(location.owner, actor) {
            return false;
        }
        let uncovered = state.is_uncovered(location);
        let position_ok = match self.position {
            PositionFilter::Covered => !uncovered,
            PositionFilter::Uncovered => uncovered,
            PositionFilter::Any => true,
        };
        if !position_ok || !self.face_state.matches(card.face_up) {
            return false;
        }
        self.value
            .map_or(true, |constraint| constraint.matches(filter_value(state, card)))
    }
}

/// Which lanes an effect may reach, relative to the source card's lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetScope {
    #[default]
    AnyLane,
    /// Only the source card's lane (on either side).
    SourceLane,
    /// Every lane except the source card's.
    OtherLanes,
}

impl TargetScope {
    /// Check if `lane` is in scope for an effect owned by a card in
    /// `source_lane`.
    #[must_use]
    pub fn allows(self, lane: usize, source_lane: usize) -> bool {
        match self {
            Self::AnyLane => true,
            Self::SourceLane => lane == source_lane,
            Self::OtherLanes => lane != source_lane,
        }
    }
}

/// Highest or lowest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extreme {
    Highest,
    Lowest,
}

/// A card's value as seen by filters.
#[must_use]
pub fn filter_value(state: &MatchState, card: &Card) -> i32 {
    if card.face_up {
        card.value
    } else {
        state.config.face_down_value
    }
}

/// Builder for target queries beyond the plain filter.
///
/// ```
/// use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
/// use compile_ccg::effects::{TargetFilter, TargetQuery};
///
/// let mut state = MatchState::new(RulesConfig::default(), 7);
/// for lane in 0..3 {
///     let card = state.new_card("Fire", lane as i32);
///     state.place_on_lane(PlayerId::FIRST, lane, card);
/// }
///
/// let filter = TargetFilter::any();
/// let elsewhere = TargetQuery::new(&filter, PlayerId::FIRST)
///     .outside_lane(0)
///     .find(&state);
/// assert_eq!(elsewhere.len(), 2);
/// ```
pub struct TargetQuery<'a> {
    filter: &'a TargetFilter,
    actor: PlayerId,
    source: Option<CardId>,
    in_lane: Option<usize>,
    outside_lane: Option<usize>,
    excluded: &'a [CardId],
    predicate: Option<&'a dyn Fn(&CardLocation, &Card) -> bool>,
}

impl<'a> TargetQuery<'a> {
    /// Create a query for `actor`.
    #[must_use]
    pub fn new(filter: &'a TargetFilter, actor: PlayerId) -> Self {
        Self {
            filter,
            actor,
            source: None,
            in_lane: None,
            outside_lane: None,
            excluded: &[],
            predicate: None,
        }
    }

    /// Set the source card (for `exclude_self`).
    #[must_use]
    pub fn source(mut self, source: CardId) -> Self {
        self.source = Some(source);
        self
    }

    /// Restrict to one lane index (both sides).
    #[must_use]
    pub fn in_lane(mut self, lane: usize) -> Self {
        self.in_lane = Some(lane);
        self
    }

    /// Exclude one lane index (both sides).
    #[must_use]
    pub fn outside_lane(mut self, lane: usize) -> Self {
        self.outside_lane = Some(lane);
        self
    }

    /// Restrict to the lanes a scope allows around `source_lane`.
    #[must_use]
    pub fn scoped(self, scope: TargetScope, source_lane: usize) -> Self {
        match scope {
            TargetScope::AnyLane => self,
            TargetScope::SourceLane => self.in_lane(source_lane),
            TargetScope::OtherLanes => self.outside_lane(source_lane),
        }
    }

    /// Skip specific cards.
    #[must_use]
    pub fn excluding(mut self, cards: &'a [CardId]) -> Self {
        self.excluded = cards;
        self
    }

    /// Add a custom predicate.
    #[must_use]
    pub fn matching(mut self, predicate: &'a dyn Fn(&CardLocation, &Card) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    fn accepts(&self, state: &MatchState, location: &CardLocation, card: &Card) -> bool {
        if self.in_lane.is_some_and(|lane| lane != location.lane) {
            return false;
        }
        if self.outside_lane == Some(location.lane) || self.excluded.contains(&card.id) {
            return false;
        }
        self.filter
            .matches(state, location, card, self.actor, self.source)
            && self.predicate.map_or(true, |p| p(location, card))
    }

    /// All matching locations, in seat order.
    #[must_use]
    pub fn find(&self, state: &MatchState) -> Vec<CardLocation> {
        state
            .board()
            .filter(|(loc, card)| self.accepts(state, loc, card))
            .map(|(loc, _)| loc)
            .collect()
    }

    /// Check if anything matches (short-circuits).
    #[must_use]
    pub fn any(&self, state: &MatchState) -> bool {
        state.board().any(|(loc, card)| self.accepts(state, &loc, card))
    }

    /// The highest or lowest matching card by filter value; first seen wins
    /// ties.
    #[must_use]
    pub fn extreme(&self, state: &MatchState, which: Extreme) -> Option<CardLocation> {
        let mut best: Option<(CardLocation, i32)> = None;
        for (loc, card) in state.board() {
            if !self.accepts(state, &loc, card) {
                continue;
            }
            let value = filter_value(state, card);
            let better = match (&best, which) {
                (None, _) => true,
                (Some((_, v)), Extreme::Highest) => value > *v,
                (Some((_, v)), Extreme::Lowest) => value < *v,
            };
            if better {
                best = Some((loc, value));
            }
        }
        best.map(|(loc, _)| loc)
    }
}

/// Every board location matching `filter` for `actor`.
#[must_use]
pub fn find_targets(
    state: &MatchState,
    filter: &TargetFilter,
    actor: PlayerId,
    source: Option<CardId>,
    scope_lane: Option<usize>,
) -> Vec<CardLocation> {
    query(filter, actor, source, scope_lane).find(state)
}

/// Check if `find_targets` would return anything.
#[must_use]
pub fn has_targets(
    state: &MatchState,
    filter: &TargetFilter,
    actor: PlayerId,
    source: Option<CardId>,
    scope_lane: Option<usize>,
) -> bool {
    query(filter, actor, source, scope_lane).any(state)
}

/// The highest or lowest matching target.
#[must_use]
pub fn find_extreme_target(
    state: &MatchState,
    filter: &TargetFilter,
    actor: PlayerId,
    source: Option<CardId>,
    which: Extreme,
) -> Option<CardLocation> {
    query(filter, actor, source, None).extreme(state, which)
}

fn query(
    filter: &TargetFilter,
    actor: PlayerId,
    source: Option<CardId>,
    scope_lane: Option<usize>,
) -> TargetQuery<'_> {
    let mut query = TargetQuery::new(filter, actor);
    if let Some(source) = source {
        query = query.source(source);
    }
    if let Some(lane) = scope_lane {
        query = query.in_lane(lane);
    }
    query
}
