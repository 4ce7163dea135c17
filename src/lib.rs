//! # compile-ccg
//!
//! Rules engine for a two-player lane card game whose card abilities are
//! data: every effect is a declarative definition (an action with its
//! parameters), interpreted against the match state at run time.
//!
//! ## Design Principles
//!
//! 1. **Definitions, not code**: cards carry `EffectDefinition`s. Executors
//!    are generic over their parameters; no card is special-cased.
//!
//! 2. **State by value**: executors take a `MatchState`, return a new one.
//!    Persistent `im` collections keep those snapshots cheap.
//!
//! 3. **Suspension is data**: when an effect needs a choice, the prompt is
//!    stored in the state and control returns to the caller. Any caller (a
//!    UI, an AI, a test) answers through the same `Choice` type.
//!
//! ## Modules
//!
//! - `core`: ids, players, configuration, RNG, log, errors, `MatchState`
//! - `cards`: card instances, effect boxes, protocols and their store
//! - `effects`: definitions, targeting, counts, modifiers, preconditions,
//!   executors
//! - `chain`: the effect chain, prompts, the scheduler, snapshots
//! - `triggers`: game events and the reactive/phase trigger collectors
//!
//! ## Example
//!
//! ```
//! use compile_ccg::{
//!     Choice, CountSpec, DeleteParams, EffectAction, EffectDefinition, EffectScheduler,
//!     MatchState, OwnerFilter, PlayerId, RulesConfig, TargetFilter,
//! };
//!
//! let mut state = MatchState::new(RulesConfig::default(), 42)
//!     .with_protocols(PlayerId::FIRST, ["Death", "Fire", "Life"])
//!     .with_protocols(PlayerId::SECOND, ["Water", "Light", "Speed"]);
//!
//! // "Delete 1 of your opponent's cards."
//! let killer = state.new_card("Death", 1).with_middle(EffectDefinition::new(
//!     EffectAction::Delete(DeleteParams {
//!         filter: TargetFilter::any().with_owner(OwnerFilter::Opponent),
//!         count: Some(CountSpec::fixed(1)),
//!         ..DeleteParams::default()
//!     }),
//! ));
//! let killer_id = killer.id;
//! state.player_mut(PlayerId::FIRST).hand.push_back(killer);
//! let victim = state.new_card("Light", 5);
//! let victim_id = victim.id;
//! state.place_on_lane(PlayerId::SECOND, 1, victim);
//!
//! let resolution = EffectScheduler::play_card(state, PlayerId::FIRST, killer_id, 0, true).unwrap();
//! let suspended = resolution.suspended().expect("delete asks for a target");
//! let resolution = suspended.resume(Choice::Card(victim_id));
//!
//! assert!(!resolution.state().is_on_board(victim_id));
//! assert_eq!(resolution.state().player(PlayerId::SECOND).discard.len(), 1);
//! ```

pub mod cards;
pub mod chain;
pub mod core;
pub mod effects;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    CardId, CardLocation, EngineError, GameRng, GameRngState, Lane, LogEntry, MatchState, PlayerId,
    PlayerMap, PlayerState, RulesConfig,
};

pub use crate::cards::{
    Card, CardDefinition, CardEffects, EffectPosition, JsonProtocolStore, ProtocolDefinition,
    ProtocolRegistry, ProtocolStore,
};

pub use crate::effects::{
    build_executor, find_extreme_target, find_targets, has_targets, resolve_count, validate_count,
    ContextData, CountSpec, DeleteParams, DiscardParams, DrawParams, EffectAction, EffectContext,
    EffectDefinition, EffectOutcome, EffectTrigger, Extreme, FaceFilter, FlipParams, OwnerFilter,
    PositionFilter, ShiftParams, Side, TargetFilter, TargetScope, ValueConstraint,
};

pub use crate::chain::{
    ActionRequired, ChainEntry, Choice, EffectChain, EffectScheduler, PromptKind, Resolution,
    SavedContinuation, SuspendedMatch,
};

pub use crate::triggers::{collect_phase_effects, collect_reactive, GameEvent, Phase};
