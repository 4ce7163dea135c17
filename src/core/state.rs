//! Match state: the single authoritative value threaded through the chain.
//!
//! ## Layout
//!
//! - `MatchState`: both players, the effect chain, the outstanding prompt,
//!   the match log and the RNG.
//! - `PlayerState`: lanes, hand, deck and discard pile of one side.
//! - `Lane`: the protocol assigned to a lane, its stack of cards (index 0
//!   is the bottom, the last card is uncovered), cached value and compiled
//!   flag.
//!
//! Card sequences use `im` persistent vectors, so cloning a `MatchState` is
//! cheap and every executor can hand back a genuinely new snapshot without
//! sharing mutable structure with the previous one.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::RulesConfig;
use super::entity::{CardId, CardLocation};
use super::log::LogEntry;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::Card;
use crate::chain::{ActionRequired, EffectChain};

/// One lane on one side of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    /// Protocol assigned to this lane.
    pub protocol: String,

    /// Card stack, bottom first. The last card is uncovered.
    pub cards: Vector<Card>,

    /// Cumulative value including modifiers (recomputed after every effect).
    pub value: i32,

    /// Has this lane's protocol been compiled?
    pub compiled: bool,
}

impl Lane {
    /// Create an empty lane for a protocol.
    #[must_use]
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            cards: Vector::new(),
            value: 0,
            compiled: false,
        }
    }

    /// The uncovered card, if the lane is not empty.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Number of cards in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Everything one player owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Lanes in board order.
    pub lanes: SmallVec<[Lane; 3]>,

    /// Cards in hand.
    pub hand: Vector<Card>,

    /// Draw pile (top = back of the vector).
    pub deck: Vector<Card>,

    /// Discard pile (most recent = back of the vector).
    pub discard: Vector<Card>,
}

impl PlayerState {
    /// Create a player with `lane_count` empty, unnamed lanes.
    #[must_use]
    pub fn new(lane_count: usize) -> Self {
        Self {
            lanes: (0..lane_count).map(|_| Lane::new("")).collect(),
            hand: Vector::new(),
            deck: Vector::new(),
            discard: Vector::new(),
        }
    }

    /// Cards available to draw, counting a discard pile that would be
    /// reshuffled.
    #[must_use]
    pub fn drawable(&self) -> usize {
        self.deck.len() + self.discard.len()
    }

    /// Protocol names in lane order.
    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.lanes.iter().map(|lane| lane.protocol.as_str())
    }
}

/// Complete match state.
///
/// ## Example
///
/// ```
/// use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
///
/// let mut state = MatchState::new(RulesConfig::default(), 42)
///     .with_protocols(PlayerId::FIRST, ["Fire", "Water", "Life"]);
///
/// let card = state.new_card("Fire", 3);
/// state.place_on_lane(PlayerId::FIRST, 0, card);
///
/// assert_eq!(state.lane(PlayerId::FIRST, 0).len(), 1);
/// assert_eq!(state.player(PlayerId::FIRST).lanes[0].protocol, "Fire");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    /// Rules this match runs under.
    pub config: RulesConfig,

    /// Both sides of the board.
    pub players: PlayerMap<PlayerState>,

    /// Whose turn it is.
    pub turn: PlayerId,

    /// Effect chain. Snapshots without one restore to an empty chain.
    #[serde(default)]
    pub chain: EffectChain,

    /// The single outstanding prompt, if the chain is suspended.
    #[serde(default)]
    pub action_required: Option<ActionRequired>,

    /// Player-visible match log.
    #[serde(default)]
    pub log: Vector<LogEntry>,

    /// Deterministic RNG.
    pub rng: GameRng,

    next_card_id: u32,
    log_sequence: u32,
}

impl MatchState {
    /// Create an empty match.
    #[must_use]
    pub fn new(config: RulesConfig, seed: u64) -> Self {
        let lane_count = config.lane_count;
        Self {
            config,
            players: PlayerMap::new(|_| PlayerState::new(lane_count)),
            turn: PlayerId::FIRST,
            chain: EffectChain::new(),
            action_required: None,
            log: Vector::new(),
            rng: GameRng::new(seed),
            next_card_id: 0,
            log_sequence: 0,
        }
    }

    /// Assign protocols to a player's lanes (builder pattern).
    ///
    /// Extra names are ignored, missing ones leave the lane unnamed.
    #[must_use]
    pub fn with_protocols<S: Into<String>>(
        mut self,
        player: PlayerId,
        protocols: impl IntoIterator<Item = S>,
    ) -> Self {
        for (lane, name) in self.players[player].lanes.iter_mut().zip(protocols) {
            lane.protocol = name.into();
        }
        self
    }

    /// Number of lanes per side.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.config.lane_count
    }

    // === Entity Management ===

    /// Allocate a new card ID.
    pub fn alloc_card_id(&mut self) -> CardId {
        let id = CardId(self.next_card_id);
        self.next_card_id += 1;
        id
    }

    /// Create a face-up card with a fresh ID and no effects.
    pub fn new_card(&mut self, protocol: impl Into<String>, value: i32) -> Card {
        let id = self.alloc_card_id();
        Card::new(id, protocol, value)
    }

    // === Accessors ===

    /// Get a player's state.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// Get a player's state mutably.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// Get a lane. Panics on an out-of-range lane index.
    #[must_use]
    pub fn lane(&self, player: PlayerId, lane: usize) -> &Lane {
        &self.players[player].lanes[lane]
    }

    /// Get a lane mutably. Panics on an out-of-range lane index.
    pub fn lane_mut(&mut self, player: PlayerId, lane: usize) -> &mut Lane {
        &mut self.players[player].lanes[lane]
    }

    /// Hand size of a player.
    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> u32 {
        self.players[player].hand.len() as u32
    }

    // === Board Queries ===

    /// Every card on the board with its location, in seat order
    /// (first seat lanes 0.., then second seat lanes 0.., bottom to top).
    pub fn board(&self) -> impl Iterator<Item = (CardLocation, &Card)> + '_ {
        PlayerId::all().flat_map(move |owner| {
            self.players[owner]
                .lanes
                .iter()
                .enumerate()
                .flat_map(move |(lane, stack)| {
                    stack.cards.iter().enumerate().map(move |(index, card)| {
                        let location = CardLocation {
                            card: card.id,
                            owner,
                            lane,
                            index,
                        };
                        (location, card)
                    })
                })
        })
    }

    /// Find where a card is on the board.
    #[must_use]
    pub fn locate(&self, id: CardId) -> Option<CardLocation> {
        self.board().find(|(_, card)| card.id == id).map(|(loc, _)| loc)
    }

    /// Get a board card by ID.
    #[must_use]
    pub fn board_card(&self, id: CardId) -> Option<&Card> {
        self.board().find(|(_, card)| card.id == id).map(|(_, card)| card)
    }

    /// Get the card at a location, if the location is still accurate.
    #[must_use]
    pub fn card_at(&self, location: &CardLocation) -> Option<&Card> {
        self.players[location.owner]
            .lanes
            .get(location.lane)?
            .cards
            .get(location.index)
            .filter(|card| card.id == location.card)
    }

    /// Check if a card is on the board.
    #[must_use]
    pub fn is_on_board(&self, id: CardId) -> bool {
        self.locate(id).is_some()
    }

    /// Check if the card at a location is the last in its lane.
    #[must_use]
    pub fn is_uncovered(&self, location: &CardLocation) -> bool {
        location.index + 1 == self.lane(location.owner, location.lane).len()
    }

    // === Board Mutation ===

    /// Put a card on top of a lane.
    ///
    /// Returns the ID of the card it covered, if any.
    pub fn place_on_lane(&mut self, player: PlayerId, lane: usize, card: Card) -> Option<CardId> {
        let stack = &mut self.players[player].lanes[lane].cards;
        let covered = stack.last().map(|c| c.id);
        stack.push_back(card);
        covered
    }

    /// Remove a card from the board.
    ///
    /// Returns its former location and the card, or `None` if it was not on
    /// the board.
    pub fn take_from_board(&mut self, id: CardId) -> Option<(CardLocation, Card)> {
        let location = self.locate(id)?;
        let card = self.players[location.owner].lanes[location.lane]
            .cards
            .remove(location.index);
        Some((location, card))
    }

    /// Mutate a board card in place.
    ///
    /// Returns `false` if the card is not on the board.
    pub fn update_board_card(&mut self, id: CardId, f: impl FnOnce(&mut Card)) -> bool {
        let Some(location) = self.locate(id) else {
            return false;
        };
        let stack = &mut self.players[location.owner].lanes[location.lane].cards;
        if let Some(card) = stack.get_mut(location.index) {
            f(card);
            true
        } else {
            false
        }
    }

    /// Move a card to its owner's discard pile, face up.
    pub fn discard_card(&mut self, owner: PlayerId, mut card: Card) {
        card.reset_visibility();
        self.players[owner].discard.push_back(card);
    }

    // === Hands and Decks ===

    /// Remove a card from a player's hand by ID.
    pub fn take_from_hand(&mut self, player: PlayerId, id: CardId) -> Option<Card> {
        let hand = &mut self.players[player].hand;
        let index = hand.iter().position(|card| card.id == id)?;
        Some(hand.remove(index))
    }

    /// Check if a card is in a player's hand.
    #[must_use]
    pub fn in_hand(&self, player: PlayerId, id: CardId) -> bool {
        self.players[player].hand.iter().any(|card| card.id == id)
    }

    /// Put cards on top of a player's deck (last item ends up on top).
    pub fn stack_deck(&mut self, player: PlayerId, cards: impl IntoIterator<Item = Card>) {
        self.players[player].deck.extend(cards);
    }

    /// Draw up to `count` cards.
    ///
    /// When the deck runs out and `reshuffle_discard` is enabled, the discard
    /// pile is shuffled into a new deck. Returns the number of cards drawn.
    pub fn draw(&mut self, player: PlayerId, count: u32) -> u32 {
        let mut drawn = 0;
        while drawn < count {
            let Some(card) = self.take_top_of_deck(player) else {
                break;
            };
            self.players[player].hand.push_back(card);
            drawn += 1;
        }
        drawn
    }

    /// Take the top card of a player's deck, reshuffling if it is empty.
    pub fn take_top_of_deck(&mut self, player: PlayerId) -> Option<Card> {
        if self.players[player].deck.is_empty() && !self.reshuffle(player) {
            return None;
        }
        let mut card = self.players[player].deck.pop_back()?;
        card.reset_visibility();
        Some(card)
    }

    fn reshuffle(&mut self, player: PlayerId) -> bool {
        if !self.config.reshuffle_discard || self.players[player].discard.is_empty() {
            return false;
        }
        let mut cards: Vec<Card> = std::mem::take(&mut self.players[player].discard)
            .into_iter()
            .collect();
        self.rng.shuffle(&mut cards);
        tracing::debug!(%player, cards = cards.len(), "reshuffling discard into deck");
        self.players[player].deck = cards.into_iter().collect();
        true
    }

    // === Logging ===

    /// Append a line to the match log.
    pub fn log(&mut self, player: Option<PlayerId>, source: Option<CardId>, message: impl Into<String>) {
        let entry = LogEntry::new(self.log_sequence, player, source, message);
        self.log_sequence += 1;
        tracing::trace!(%entry, "match log");
        self.log.push_back(entry);
    }

    /// Iterate over log messages, oldest first.
    pub fn log_messages(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(|entry| entry.message.as_str())
    }
}
