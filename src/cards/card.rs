//! Card instances.
//!
//! A `Card` is created when a deck is built and lives for the whole match,
//! moving between deck, hand, lanes and discard pile. Its face state and
//! reveal flag change along the way; its printed value and effects do not.
//!
//! ## Effect Positions
//!
//! Each card carries up to three effect boxes. Which boxes are active
//! depends on where the card is:
//!
//! | Box | Active when |
//! |---|---|
//! | top | face up (even when covered) |
//! | middle | face up and uncovered |
//! | bottom | face up and uncovered |
//!
//! Face-down cards have no active effects.

use serde::{Deserialize, Serialize};

use crate::core::CardId;
use crate::effects::EffectDefinition;

/// One of a card's three effect boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPosition {
    Top,
    Middle,
    Bottom,
}

impl EffectPosition {
    /// All positions, top to bottom.
    pub const ALL: [EffectPosition; 3] = [Self::Top, Self::Middle, Self::Bottom];

    /// Check if effects in this box are active.
    #[must_use]
    pub const fn is_active(self, face_up: bool, uncovered: bool) -> bool {
        face_up && (matches!(self, Self::Top) || uncovered)
    }
}

/// The effect boxes of a card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardEffects {
    pub top: Vec<EffectDefinition>,
    pub middle: Vec<EffectDefinition>,
    pub bottom: Vec<EffectDefinition>,
}

impl CardEffects {
    /// Definitions in one box.
    #[must_use]
    pub fn at(&self, position: EffectPosition) -> &[EffectDefinition] {
        match position {
            EffectPosition::Top => &self.top,
            EffectPosition::Middle => &self.middle,
            EffectPosition::Bottom => &self.bottom,
        }
    }

    /// Every definition with its box, top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = (EffectPosition, &EffectDefinition)> {
        EffectPosition::ALL
            .into_iter()
            .flat_map(move |pos| self.at(pos).iter().map(move |def| (pos, def)))
    }

    /// Check if the card has no effects at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.middle.is_empty() && self.bottom.is_empty()
    }
}

/// A card instance.
///
/// ## Example
///
/// ```
/// use compile_ccg::cards::Card;
/// use compile_ccg::core::CardId;
/// use compile_ccg::effects::{DrawParams, EffectAction, EffectDefinition};
///
/// let card = Card::new(CardId::new(1), "Speed", 1)
///     .with_middle(EffectDefinition::new(EffectAction::Draw(DrawParams::default())));
///
/// assert!(card.face_up);
/// assert_eq!(card.active_effects(true).count(), 1);
/// assert_eq!(card.active_effects(false).count(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    /// Protocol this card belongs to.
    pub protocol: String,

    /// Printed value.
    pub value: i32,

    pub face_up: bool,

    /// Shown to the opponent while in hand or face down.
    #[serde(default)]
    pub revealed: bool,

    #[serde(default, skip_serializing_if = "CardEffects::is_empty")]
    pub effects: CardEffects,
}

impl Card {
    /// Create a face-up card with no effects.
    #[must_use]
    pub fn new(id: CardId, protocol: impl Into<String>, value: i32) -> Self {
        Self {
            id,
            protocol: protocol.into(),
            value,
            face_up: true,
            revealed: false,
            effects: CardEffects::default(),
        }
    }

    /// Turn face down (builder pattern).
    #[must_use]
    pub fn face_down(mut self) -> Self {
        self.face_up = false;
        self
    }

    /// Set all effect boxes (builder pattern).
    #[must_use]
    pub fn with_effects(mut self, effects: CardEffects) -> Self {
        self.effects = effects;
        self
    }

    /// Add a top-box effect (builder pattern).
    #[must_use]
    pub fn with_top(mut self, effect: EffectDefinition) -> Self {
        self.effects.top.push(effect);
        self
    }

    /// Add a middle-box effect (builder pattern).
    #[must_use]
    pub fn with_middle(mut self, effect: EffectDefinition) -> Self {
        self.effects.middle.push(effect);
        self
    }

    /// Add a bottom-box effect (builder pattern).
    #[must_use]
    pub fn with_bottom(mut self, effect: EffectDefinition) -> Self {
        self.effects.bottom.push(effect);
        self
    }

    /// Active effects given whether the card is uncovered.
    pub fn active_effects(
        &self,
        uncovered: bool,
    ) -> impl Iterator<Item = (EffectPosition, &EffectDefinition)> {
        let face_up = self.face_up;
        self.effects
            .iter()
            .filter(move |(pos, _)| pos.is_active(face_up, uncovered))
    }

    /// Forget face state and reveals when leaving the board (hand, deck,
    /// discard).
    pub fn reset_visibility(&mut self) {
        self.face_up = true;
        self.revealed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{DrawParams, EffectAction};

    fn draw() -> EffectDefinition {
        EffectDefinition::new(EffectAction::Draw(DrawParams::default()))
    }

    #[test]
    fn test_position_rules() {
        assert!(EffectPosition::Top.is_active(true, false));
        assert!(EffectPosition::Top.is_active(true, true));
        assert!(!EffectPosition::Top.is_active(false, true));
        assert!(EffectPosition::Middle.is_active(true, true));
        assert!(!EffectPosition::Middle.is_active(true, false));
        assert!(!EffectPosition::Bottom.is_active(true, false));
    }

    #[test]
    fn test_active_effects_when_covered() {
        let card = Card::new(CardId(1), "Fire", 3)
            .with_top(draw())
            .with_middle(draw())
            .with_bottom(draw());

        let covered: Vec<_> = card.active_effects(false).map(|(pos, _)| pos).collect();
        assert_eq!(covered, vec![EffectPosition::Top]);
        assert_eq!(card.active_effects(true).count(), 3);
    }

    #[test]
    fn test_face_down_has_no_active_effects() {
        let card = Card::new(CardId(1), "Fire", 3).with_top(draw()).face_down();
        assert_eq!(card.active_effects(true).count(), 0);
    }

    #[test]
    fn test_reset_visibility() {
        let mut card = Card::new(CardId(2), "Water", 0).face_down();
        card.revealed = true;
        card.reset_visibility();
        assert!(card.face_up);
        assert!(!card.revealed);
    }

    #[test]
    fn test_serialization_skips_empty_effects() {
        let card = Card::new(CardId(4), "Life", 2);
        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("effects"));
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
