//! Protocols: named six-card sets, their registry and the persistence
//! boundary for user-authored protocols.
//!
//! The engine never touches storage directly. A `ProtocolStore` hands it a
//! list of `ProtocolDefinition` records and takes a list back; what sits
//! behind the trait (a file, a browser key-value store, a database) is the
//! caller's business.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardEffects};
use crate::core::{EngineError, MatchState, PlayerId};

/// Printed data for one card of a protocol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub value: i32,
    #[serde(default)]
    pub effects: CardEffects,
}

impl CardDefinition {
    #[must_use]
    pub fn new(value: i32, effects: CardEffects) -> Self {
        Self { value, effects }
    }
}

/// A named set of cards sharing a theme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDefinition {
    pub name: String,
    pub cards: Vec<CardDefinition>,
}

impl ProtocolDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Add a card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, value: i32, effects: CardEffects) -> Self {
        self.cards.push(CardDefinition::new(value, effects));
        self
    }
}

/// Protocol lookup by name.
///
/// ## Example
///
/// ```
/// use compile_ccg::cards::{CardEffects, ProtocolDefinition, ProtocolRegistry};
/// use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
///
/// let mut registry = ProtocolRegistry::new();
/// for name in ["Fire", "Water", "Life"] {
///     let mut protocol = ProtocolDefinition::new(name);
///     for value in 0..6 {
///         protocol = protocol.with_card(value, CardEffects::default());
///     }
///     registry.register(protocol);
/// }
///
/// let mut state = MatchState::new(RulesConfig::default(), 9);
/// registry.setup_player(&mut state, PlayerId::FIRST, &["Fire", "Water", "Life"]).unwrap();
///
/// assert_eq!(state.player(PlayerId::FIRST).deck.len(), 18);
/// assert_eq!(state.player(PlayerId::FIRST).lanes[2].protocol, "Life");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProtocolRegistry {
    protocols: FxHashMap<String, ProtocolDefinition>,
}

impl ProtocolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from store records.
    pub fn from_store(store: &dyn ProtocolStore) -> Result<Self, EngineError> {
        let mut registry = Self::new();
        for protocol in store.load()? {
            registry.register(protocol);
        }
        Ok(registry)
    }

    /// Register a protocol, replacing any protocol with the same name.
    ///
    /// Returns the replaced definition.
    pub fn register(&mut self, protocol: ProtocolDefinition) -> Option<ProtocolDefinition> {
        let replaced = self.protocols.insert(protocol.name.clone(), protocol);
        if let Some(old) = &replaced {
            tracing::debug!(protocol = %old.name, "replacing protocol definition");
        }
        replaced
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProtocolDefinition> {
        self.protocols.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.protocols.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    /// All protocol names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.protocols.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Export every protocol, sorted by name, for a store.
    #[must_use]
    pub fn to_records(&self) -> Vec<ProtocolDefinition> {
        self.names()
            .into_iter()
            .filter_map(|name| self.protocols.get(name).cloned())
            .collect()
    }

    /// Create card instances for the named protocols.
    pub fn build_deck(&self, state: &mut MatchState, protocols: &[&str]) -> Result<Vec<Card>, EngineError> {
        let mut deck = Vec::new();
        for name in protocols {
            let protocol = self
                .get(name)
                .ok_or_else(|| EngineError::UnknownProtocol((*name).to_string()))?;
            for def in &protocol.cards {
                let card = state
                    .new_card(protocol.name.clone(), def.value)
                    .with_effects(def.effects.clone());
                deck.push(card);
            }
        }
        Ok(deck)
    }

    /// Assign protocols to a player's lanes and shuffle their cards into the
    /// player's deck.
    pub fn setup_player(
        &self,
        state: &mut MatchState,
        player: PlayerId,
        protocols: &[&str],
    ) -> Result<(), EngineError> {
        let mut deck = self.build_deck(state, protocols)?;
        state.rng.shuffle(&mut deck);
        let side = state.player_mut(player);
        for (lane, name) in side.lanes.iter_mut().zip(protocols) {
            lane.protocol = (*name).to_string();
            lane.compiled = false;
        }
        side.deck = deck.into_iter().collect();
        Ok(())
    }
}

/// Load/save boundary for protocol records.
pub trait ProtocolStore {
    /// Load every stored protocol.
    fn load(&self) -> Result<Vec<ProtocolDefinition>, EngineError>;

    /// Replace the stored protocols.
    fn save(&mut self, protocols: &[ProtocolDefinition]) -> Result<(), EngineError>;
}

/// In-memory store holding protocol records as a JSON document.
#[derive(Clone, Debug, Default)]
pub struct JsonProtocolStore {
    document: Option<String>,
}

impl JsonProtocolStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON document.
    #[must_use]
    pub fn from_json(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
        }
    }

    /// The stored document, if anything was saved.
    #[must_use]
    pub fn as_json(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl ProtocolStore for JsonProtocolStore {
    fn load(&self) -> Result<Vec<ProtocolDefinition>, EngineError> {
        match &self.document {
            Some(doc) => Ok(serde_json::from_str(doc)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, protocols: &[ProtocolDefinition]) -> Result<(), EngineError> {
        let names: Vec<&str> = protocols.iter().map(|p| p.name.as_str()).collect();
        if let Some(dup) = names
            .iter()
            .enumerate()
            .find(|(i, name)| names[..*i].contains(name))
            .map(|(_, name)| *name)
        {
            return Err(EngineError::Store(format!("duplicate protocol '{dup}'")));
        }
        self.document = Some(serde_json::to_string(protocols)?);
        Ok(())
    }
}
