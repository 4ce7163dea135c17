//! Core engine types: ids, players, configuration, RNG, log, errors and the
//! match state itself.
//!
//! Everything above this module (cards, effects, chain, triggers) reads and
//! produces `MatchState` values. Rules variants configure the engine through
//! `RulesConfig` rather than by modifying executors.

pub mod config;
pub mod entity;
pub mod error;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{RulesConfig, DEFAULT_FACE_DOWN_VALUE, DEFAULT_LANE_COUNT};
pub use entity::{CardId, CardLocation};
pub use error::EngineError;
pub use log::LogEntry;
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{Lane, MatchState, PlayerState};
