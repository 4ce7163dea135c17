//! Execution context and outcome.
//!
//! `EffectContext` is the read-only view an executor gets of the chain
//! entry it is running: source card, lane, owner and the context data
//! threaded forward by earlier effects. `EffectOutcome` is what it hands
//! back.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::EffectDefinition;
use crate::chain::{ActionRequired, ChainEntry, PromptKind};
use crate::core::{CardId, MatchState, PlayerId};
use crate::triggers::GameEvent;

/// Values produced by one effect for later effects in the same sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextData {
    /// Cards discarded by the most recent discard.
    pub discarded_count: Option<u32>,
    /// Card picked by the most recent targeted effect.
    pub referenced_card: Option<CardId>,
    /// Value of that card when it was picked.
    pub referenced_value: Option<i32>,
    /// Acting player's hand size before the most recent discard.
    pub previous_hand_size: Option<u32>,
}

impl ContextData {
    /// Overlay `newer` on top of `self`; fields `newer` sets win.
    pub fn merge(&mut self, newer: ContextData) {
        if newer.discarded_count.is_some() {
            self.discarded_count = newer.discarded_count;
        }
        if newer.referenced_card.is_some() {
            self.referenced_card = newer.referenced_card;
            self.referenced_value = newer.referenced_value;
        }
        if newer.previous_hand_size.is_some() {
            self.previous_hand_size = newer.previous_hand_size;
        }
    }

    /// Record a referenced card (builder pattern).
    #[must_use]
    pub fn with_reference(mut self, card: CardId, value: i32) -> Self {
        self.referenced_card = Some(card);
        self.referenced_value = Some(value);
        self
    }
}

/// Read-only view of the entry being executed.
#[derive(Clone, Copy, Debug)]
pub struct EffectContext<'a> {
    entry: &'a ChainEntry,
}

impl<'a> EffectContext<'a> {
    #[must_use]
    pub fn new(entry: &'a ChainEntry) -> Self {
        Self { entry }
    }

    #[must_use]
    pub fn entry(&self) -> &'a ChainEntry {
        self.entry
    }

    #[must_use]
    pub fn definition(&self) -> &'a EffectDefinition {
        &self.entry.definition
    }

    #[must_use]
    pub fn source_card(&self) -> CardId {
        self.entry.source_card
    }

    /// Lane of the source card when the effect was scheduled.
    #[must_use]
    pub fn lane(&self) -> usize {
        self.entry.lane
    }

    /// Player whose card owns the effect.
    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.entry.owner
    }

    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.entry.owner.opponent()
    }

    #[must_use]
    pub fn data(&self) -> &'a ContextData {
        &self.entry.data
    }

    #[must_use]
    pub fn optional(&self) -> bool {
        self.entry.definition.optional
    }

    /// Build a prompt for the owner.
    #[must_use]
    pub fn prompt(&self, kind: PromptKind) -> ActionRequired {
        self.prompt_for(self.owner(), kind)
    }

    /// Build a prompt for a specific player.
    #[must_use]
    pub fn prompt_for(&self, actor: PlayerId, kind: PromptKind) -> ActionRequired {
        ActionRequired {
            actor,
            source_card: self.source_card(),
            lane: self.lane(),
            optional: self.optional(),
            follow_up: self
                .entry
                .definition
                .conditional
                .as_ref()
                .map(|c| c.then_effect.clone()),
            kind,
        }
    }
}

/// Result of running (part of) an effect.
#[derive(Clone, Debug)]
pub struct EffectOutcome {
    pub state: MatchState,

    /// Set when the effect needs input before it can continue.
    pub action_required: Option<ActionRequired>,

    /// Whether anything was actually consumed or changed.
    pub executed: bool,

    pub events: SmallVec<[GameEvent; 4]>,

    pub data: ContextData,

    /// Effects to run next, before anything already queued.
    pub spawn: Vec<EffectDefinition>,
}

impl EffectOutcome {
    /// The effect finished and did something.
    #[must_use]
    pub fn done(state: MatchState) -> Self {
        Self {
            state,
            action_required: None,
            executed: true,
            events: SmallVec::new(),
            data: ContextData::default(),
            spawn: Vec::new(),
        }
    }

    /// The effect finished without doing anything.
    #[must_use]
    pub fn noop(state: MatchState) -> Self {
        Self {
            executed: false,
            ..Self::done(state)
        }
    }

    /// The effect needs input.
    #[must_use]
    pub fn prompt(state: MatchState, prompt: ActionRequired) -> Self {
        Self {
            action_required: Some(prompt),
            executed: false,
            ..Self::done(state)
        }
    }

    /// Add an event (builder pattern).
    #[must_use]
    pub fn with_event(mut self, event: GameEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Add events (builder pattern).
    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = GameEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Set context data (builder pattern).
    #[must_use]
    pub fn with_data(mut self, data: ContextData) -> Self {
        self.data = data;
        self
    }

    /// Mark as executed (builder pattern).
    #[must_use]
    pub fn executed(mut self, executed: bool) -> Self {
        self.executed = executed;
        self
    }

    /// Check if the outcome suspends the chain.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.action_required.is_some()
    }
}
