//! Shared fixtures for integration tests.

#![allow(dead_code)]

use compile_ccg::chain::ChainEntry;
use compile_ccg::core::{CardId, MatchState, PlayerId, RulesConfig};
use compile_ccg::effects::EffectDefinition;
use compile_ccg::cards::Card;

/// Route engine diagnostics to the test output. Set `RUST_LOG=debug` to see
/// scheduler transitions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Source id for effects that do not come from a card on the board.
pub const NO_SOURCE: CardId = CardId(9_999);

/// Builds a match board card by card.
pub struct Board {
    state: MatchState,
}

impl Board {
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        init_tracing();
        let state = MatchState::new(config, 42)
            .with_protocols(PlayerId::FIRST, ["Fire", "Water", "Life"])
            .with_protocols(PlayerId::SECOND, ["Death", "Light", "Speed"]);
        Self { state }
    }

    /// Put a face-up card on top of a lane.
    pub fn face_up(&mut self, player: PlayerId, lane: usize, value: i32) -> CardId {
        let protocol = self.state.lane(player, lane).protocol.clone();
        let card = self.state.new_card(protocol, value);
        self.place(player, lane, card)
    }

    /// Put a face-down card on top of a lane.
    pub fn face_down(&mut self, player: PlayerId, lane: usize, value: i32) -> CardId {
        let protocol = self.state.lane(player, lane).protocol.clone();
        let card = self.state.new_card(protocol, value).face_down();
        self.place(player, lane, card)
    }

    /// Put a card built by `build` on top of a lane.
    pub fn custom(&mut self, player: PlayerId, lane: usize, build: impl FnOnce(Card) -> Card) -> CardId {
        let protocol = self.state.lane(player, lane).protocol.clone();
        let card = build(self.state.new_card(protocol, 1));
        self.place(player, lane, card)
    }

    pub fn place(&mut self, player: PlayerId, lane: usize, card: Card) -> CardId {
        let id = card.id;
        self.state.place_on_lane(player, lane, card);
        id
    }

    /// Add cards with the given values to a player's hand.
    pub fn hand(&mut self, player: PlayerId, values: &[i32]) -> Vec<CardId> {
        values
            .iter()
            .map(|&value| {
                let card = self.state.new_card("Fire", value);
                let id = card.id;
                self.state.player_mut(player).hand.push_back(card);
                id
            })
            .collect()
    }

    /// Add a card to a player's hand.
    pub fn hand_card(&mut self, player: PlayerId, card: Card) -> CardId {
        let id = card.id;
        self.state.player_mut(player).hand.push_back(card);
        id
    }

    /// Put `count` cards in a player's deck.
    pub fn deck(&mut self, player: PlayerId, count: usize) {
        let cards: Vec<_> = (0..count)
            .map(|i| self.state.new_card("Fire", (i % 6) as i32))
            .collect();
        self.state.stack_deck(player, cards);
    }

    pub fn card(&mut self, protocol: &str, value: i32) -> Card {
        self.state.new_card(protocol, value)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn build(self) -> MatchState {
        self.state
    }
}

/// An entry for `definition` owned by `owner`, sourced from `source` in `lane`.
pub fn entry(definition: EffectDefinition, source: CardId, lane: usize, owner: PlayerId) -> ChainEntry {
    ChainEntry::new(definition, source, lane, owner)
}
