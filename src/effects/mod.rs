//! Card effects: what they say, whom they hit, and how they run.
//!
//! - [`EffectDefinition`]: an action with its trigger, optional flag and
//!   conditional follow-up, as stored in protocol data
//! - [`TargetFilter`] / [`TargetQuery`]: which board cards an effect may pick
//! - [`CountSpec`]: fixed or state-derived counts
//! - [`modifiers`]: value modifiers and passive rules read off the board
//! - [`precondition`]: can an entry do anything at all right now?
//! - [`executors`]: one module per action kind
//!
//! Executors never touch the chain. They take a state, return an
//! [`EffectOutcome`], and leave queueing to [`crate::chain`].

mod context;
pub mod count;
mod definition;
pub mod executors;
pub mod modifiers;
pub mod precondition;
mod targeting;

pub use context::{ContextData, EffectContext, EffectOutcome};
pub use count::{resolve_count, validate_count, CountSpec};
pub use definition::{
    ChoiceParams, Conditional, ConditionalKind, DeleteParams, DiscardParams, DrawParams,
    EffectAction, EffectDefinition, EffectTrigger, FlipParams, GiveParams, PassiveRuleParams,
    PlayDestination, PlayParams, PlaySource, ProtocolParams, ReturnParams, RevealParams,
    RevealSource, ShiftDestination, ShiftParams, Side, TakeParams, ValueModifierParams,
};
pub use executors::{build_executor, Executor};
pub use modifiers::{ModifierScope, PassiveRule, ProtectedAction, ValueModifier};
pub use precondition::{Precondition, SkipReason};
pub use targeting::{
    filter_value, find_extreme_target, find_targets, has_targets, Extreme, FaceFilter,
    OwnerFilter, PositionFilter, TargetFilter, TargetQuery, TargetScope, ValueConstraint,
};
