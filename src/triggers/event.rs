//! Game events emitted by executors.
//!
//! Executors report what they did as a list of events. The scheduler feeds
//! those to the reactive collector once the effect has fully resolved.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};

/// Something that happened during an effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    CardsDrawn {
        player: PlayerId,
        count: u32,
    },
    CardsDiscarded {
        player: PlayerId,
        count: u32,
    },
    CardDeleted {
        card: CardId,
        owner: PlayerId,
        /// Player whose effect deleted it.
        by: PlayerId,
    },
    CardFlipped {
        card: CardId,
        owner: PlayerId,
        /// Face state after the flip.
        face_up: bool,
        by: PlayerId,
    },
    CardShifted {
        card: CardId,
        owner: PlayerId,
        from: usize,
        to: usize,
        by: PlayerId,
    },
    CardReturned {
        card: CardId,
        owner: PlayerId,
    },
    /// A card got another card placed on top of it.
    CardCovered {
        card: CardId,
        owner: PlayerId,
        lane: usize,
    },
    CardPlayed {
        card: CardId,
        owner: PlayerId,
        lane: usize,
        face_up: bool,
    },
    /// End-of-turn hand cleanup.
    CacheCleared {
        player: PlayerId,
    },
}

impl GameEvent {
    /// The player who performed the action, for "after you ..." triggers.
    #[must_use]
    pub fn actor(&self) -> PlayerId {
        match *self {
            Self::CardsDrawn { player, .. }
            | Self::CardsDiscarded { player, .. }
            | Self::CacheCleared { player } => player,
            Self::CardDeleted { by, .. }
            | Self::CardFlipped { by, .. }
            | Self::CardShifted { by, .. } => by,
            Self::CardReturned { owner, .. }
            | Self::CardCovered { owner, .. }
            | Self::CardPlayed { owner, .. } => owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor() {
        let event = GameEvent::CardDeleted {
            card: CardId(1),
            owner: PlayerId::SECOND,
            by: PlayerId::FIRST,
        };
        assert_eq!(event.actor(), PlayerId::FIRST);

        let event = GameEvent::CardsDrawn {
            player: PlayerId::SECOND,
            count: 2,
        };
        assert_eq!(event.actor(), PlayerId::SECOND);
    }

    #[test]
    fn test_serialization() {
        let event = GameEvent::CardShifted {
            card: CardId(3),
            owner: PlayerId::FIRST,
            from: 0,
            to: 2,
            by: PlayerId::SECOND,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"card_shifted""#));
        let deserialized: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
