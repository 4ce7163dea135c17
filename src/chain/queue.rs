//! The effect chain: pending entries, the entry being executed, and a LIFO
//! stack of saved continuations for reactive interrupts.
//!
//! ## Interrupts
//!
//! When a reactive effect must run before the rest of the current chain,
//! [`EffectChain::push_interrupt`] saves the current entry and every pending
//! entry as one `SavedContinuation` and leaves the chain empty. Once the
//! reactive effects have drained, [`EffectChain::pop_interrupt`] puts the
//! saved continuation back.
//!
//! ```
//! use compile_ccg::chain::{ChainEntry, EffectChain};
//! use compile_ccg::core::{CardId, PlayerId};
//! use compile_ccg::effects::{DrawParams, EffectAction, EffectDefinition};
//!
//! let draw = EffectDefinition::new(EffectAction::Draw(DrawParams::default()));
//! let mut chain = EffectChain::new();
//! chain.append(ChainEntry::new(draw.clone(), CardId(1), 0, PlayerId::FIRST));
//! chain.append(ChainEntry::new(draw, CardId(2), 1, PlayerId::FIRST));
//!
//! assert!(chain.push_interrupt());
//! assert_eq!(chain.pending_len(), 0);
//! assert_eq!(chain.depth(), 1);
//!
//! assert!(chain.pop_interrupt());
//! assert_eq!(chain.pending_len(), 2);
//! assert_eq!(chain.depth(), 0);
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};
use crate::effects::{ConditionalKind, ContextData, EffectDefinition};
use crate::triggers::GameEvent;

/// Work an entry has done so far, kept across suspensions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    /// Did any step consume a target or resource?
    pub executed: bool,
    /// Events emitted so far, handed to the reactive collector on completion.
    pub events: Vec<GameEvent>,
    /// Effects chosen to run next.
    pub spawn: Vec<EffectDefinition>,
}

/// One scheduled instance of an effect definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub definition: EffectDefinition,

    /// Card whose effect this is.
    pub source_card: CardId,

    /// Lane the source card was in when the entry was scheduled.
    pub lane: usize,

    /// Player who owns the source card.
    pub owner: PlayerId,

    /// How this entry was scheduled, if it is a follow-up.
    #[serde(default)]
    pub conditional: Option<ConditionalKind>,

    /// Context threaded from earlier effects.
    #[serde(default)]
    pub data: ContextData,

    #[serde(default)]
    pub progress: Progress,
}

impl ChainEntry {
    #[must_use]
    pub fn new(definition: EffectDefinition, source_card: CardId, lane: usize, owner: PlayerId) -> Self {
        Self {
            definition,
            source_card,
            lane,
            owner,
            conditional: None,
            data: ContextData::default(),
            progress: Progress::default(),
        }
    }

    /// Set context data (builder pattern).
    #[must_use]
    pub fn with_data(mut self, data: ContextData) -> Self {
        self.data = data;
        self
    }

    /// A new entry for `definition` from the same source, carrying this
    /// entry's context data forward.
    #[must_use]
    pub fn derive(&self, definition: EffectDefinition) -> Self {
        Self::new(definition, self.source_card, self.lane, self.owner).with_data(self.data)
    }
}

/// A pre-interrupt snapshot of the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedContinuation {
    pub current: Option<ChainEntry>,
    pub pending: VecDeque<ChainEntry>,
}

impl SavedContinuation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }
}

/// Pending entries, the current entry and saved continuations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectChain {
    pending: VecDeque<ChainEntry>,
    current: Option<ChainEntry>,
    interrupts: Vec<SavedContinuation>,
}

impl EffectChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push to the back.
    pub fn append(&mut self, entry: ChainEntry) {
        self.pending.push_back(entry);
    }

    /// Push several to the back, keeping their order.
    pub fn append_many(&mut self, entries: impl IntoIterator<Item = ChainEntry>) {
        self.pending.extend(entries);
    }

    /// Push to the front.
    pub fn prepend(&mut self, entry: ChainEntry) {
        self.pending.push_front(entry);
    }

    /// Move the front entry into `current` and return it.
    pub fn pop_next(&mut self) -> Option<&ChainEntry> {
        let entry = self.pending.pop_front()?;
        self.current = Some(entry);
        self.current.as_ref()
    }

    /// Save `current` and `pending` as a continuation and clear both.
    ///
    /// Returns `false` (and does nothing) when there is nothing to save.
    pub fn push_interrupt(&mut self) -> bool {
        let saved = SavedContinuation {
            current: self.current.take(),
            pending: std::mem::take(&mut self.pending),
        };
        if saved.is_empty() {
            return false;
        }
        tracing::debug!(depth = self.interrupts.len() + 1, "chain interrupted");
        self.interrupts.push(saved);
        true
    }

    /// Restore the most recent continuation once this level has drained.
    ///
    /// Returns `false` if this level is not drained or nothing is saved.
    pub fn pop_interrupt(&mut self) -> bool {
        if !self.pending.is_empty() || self.current.is_some() {
            return false;
        }
        let Some(saved) = self.interrupts.pop() else {
            return false;
        };
        tracing::debug!(depth = self.interrupts.len(), "chain resumed after interrupt");
        self.current = saved.current;
        self.pending = saved.pending;
        true
    }

    /// Anything left to run at this level or a saved one.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || !self.interrupts.is_empty()
    }

    /// No entries anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.current.is_none() && self.interrupts.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> Option<&ChainEntry> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut ChainEntry> {
        self.current.as_mut()
    }

    /// Remove and return the current entry.
    pub fn take_current(&mut self) -> Option<ChainEntry> {
        self.current.take()
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Pending entries at this level, front first.
    pub fn pending(&self) -> impl Iterator<Item = &ChainEntry> {
        self.pending.iter()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Saved continuations, oldest first.
    #[must_use]
    pub fn interrupts(&self) -> &[SavedContinuation] {
        &self.interrupts
    }

    /// Number of saved continuations.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.interrupts.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
        self.interrupts.clear();
    }
}
