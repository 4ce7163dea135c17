//! Card identification.
//!
//! Every card instance in a match has a unique `CardId`, allocated by
//! `MatchState::alloc_card_id` when the card is created (deck building,
//! tokens). Ids are never reused within a match, so a stale id reliably
//! means "this card left the board".
//!
//! ## Usage
//!
//! ```
//! use compile_ccg::core::CardId;
//!
//! let card = CardId::new(7);
//! assert_eq!(card.raw(), 7);
//! assert_eq!(format!("{}", card), "Card(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Where a card currently sits on the board.
///
/// `index` counts from the bottom of the lane stack; the uncovered card of
/// a lane is the one at `len - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardLocation {
    /// The card at this location.
    pub card: CardId,
    /// Side of the board the lane belongs to.
    pub owner: super::PlayerId,
    /// Lane index (0-based).
    pub lane: usize,
    /// Position within the lane stack (0 = bottom).
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_basics() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(CardId::from(42), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CardId(3)), "Card(3)");
    }

    #[test]
    fn test_ordering() {
        assert!(CardId(1) < CardId(2));
    }

    #[test]
    fn test_serialization() {
        let id = CardId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
