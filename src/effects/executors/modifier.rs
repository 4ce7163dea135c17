//! Value modifiers and passive rules.
//!
//! Neither does anything when "executed": both are read straight off the
//! board by [`crate::effects::modifiers`] while their card is face up.

use crate::core::MatchState;
use crate::effects::{EffectContext, EffectOutcome};

#[must_use]
pub fn execute(ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    tracing::trace!(
        source = %ctx.source_card(),
        action = ctx.definition().action_name(),
        "static effect queued; nothing to run"
    );
    EffectOutcome::noop(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainEntry;
    use crate::core::{CardId, PlayerId, RulesConfig};
    use crate::effects::{
        EffectAction, EffectDefinition, ModifierScope, OwnerFilter, ValueModifier, ValueModifierParams,
    };

    #[test]
    fn test_modifier_is_noop() {
        let def = EffectDefinition::new(EffectAction::ValueModifier(ValueModifierParams {
            modifier: ValueModifier::AddToTotal {
                amount: 1,
                owner: OwnerFilter::Own,
                scope: ModifierScope::SourceLane,
            },
        }));
        let e = ChainEntry::new(def, CardId(99), 0, PlayerId::FIRST);
        let state = MatchState::new(RulesConfig::default(), 1);
        let outcome = execute(&EffectContext::new(&e), state);
        assert!(!outcome.executed);
        assert!(outcome.action_required.is_none());
    }
}
