//! Event-driven triggers.
//!
//! Executors report what they did as [`GameEvent`]s. Once an effect has fully
//! resolved, the scheduler hands its events to [`collect_reactive`], which
//! finds every definition on the board whose `trigger` reacts to them. Those
//! entries interrupt the rest of the chain.
//!
//! Turn-phase effects are gathered separately by [`collect_phase_effects`].
//!
//! ## Example
//!
//! ```
//! use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
//! use compile_ccg::effects::{DrawParams, EffectAction, EffectDefinition, EffectTrigger};
//! use compile_ccg::triggers::{collect_reactive, GameEvent};
//!
//! let mut state = MatchState::new(RulesConfig::default(), 7);
//! let watcher = state.new_card("Spirit", 3).with_middle(
//!     EffectDefinition::new(EffectAction::Draw(DrawParams::default()))
//!         .with_trigger(EffectTrigger::AfterOpponentDiscard),
//! );
//! state.place_on_lane(PlayerId::FIRST, 1, watcher);
//!
//! let discarded = GameEvent::CardsDiscarded { player: PlayerId::SECOND, count: 2 };
//! let entries = collect_reactive(&state, &[discarded]);
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].owner, PlayerId::FIRST);
//! ```

mod event;
mod reactive;

pub use event::GameEvent;
pub use reactive::{collect_phase_effects, collect_reactive, Phase};
