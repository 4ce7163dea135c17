//! "Either/or" effects: the owner picks one of several definitions, which is
//! then queued right behind the choice.

use crate::chain::PromptKind;
use crate::core::MatchState;
use crate::effects::{ChoiceParams, EffectContext, EffectDefinition, EffectOutcome};

#[must_use]
pub fn execute(params: &ChoiceParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    match params.options.as_slice() {
        [] => {
            state.log(Some(ctx.owner()), Some(ctx.source_card()), "Choice: no options");
            EffectOutcome::noop(state)
        }
        [only] => on_option(ctx, state, std::slice::from_ref(only), 0),
        options => {
            let prompt = ctx.prompt(PromptKind::ChooseOption {
                options: options.to_vec(),
            });
            EffectOutcome::prompt(state, prompt)
        }
    }
}

/// Queue the chosen option.
#[must_use]
pub fn on_option(
    ctx: &EffectContext<'_>,
    mut state: MatchState,
    options: &[EffectDefinition],
    index: usize,
) -> EffectOutcome {
    let Some(chosen) = options.get(index) else {
        tracing::warn!(index, options = options.len(), "choice index out of range");
        return EffectOutcome::noop(state);
    };
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("chooses {}", chosen.action_name()),
    );
    let mut outcome = EffectOutcome::done(state);
    outcome.spawn.push(chosen.clone());
    outcome
}
