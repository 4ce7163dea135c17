//! Cards and protocols.
//!
//! ## Key Types
//!
//! - `Card`: a card instance (id, protocol, value, face state, effects)
//! - `CardEffects` / `EffectPosition`: the three effect boxes and when each
//!   is active
//! - `ProtocolDefinition`: a named set of printed cards
//! - `ProtocolRegistry`: protocol lookup and deck building
//! - `ProtocolStore`: load/save boundary for protocol records

pub mod card;
pub mod protocol;

pub use card::{Card, CardEffects, EffectPosition};
pub use protocol::{
    CardDefinition, JsonProtocolStore, ProtocolDefinition, ProtocolRegistry, ProtocolStore,
};
