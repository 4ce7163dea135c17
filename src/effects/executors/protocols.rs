//! Rearrange or swap a player's protocols.
//!
//! Protocols move between lanes with their compiled flag; the cards in the
//! lanes stay where they are.

use crate::chain::PromptKind;
use crate::core::{MatchState, PlayerId};
use crate::effects::{EffectContext, EffectOutcome, ProtocolParams};

use super::side_player;

#[must_use]
pub fn execute_rearrange(params: &ProtocolParams, ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    let target = side_player(ctx, params.target);
    let prompt = ctx.prompt(PromptKind::RearrangeProtocols { target });
    EffectOutcome::prompt(state, prompt)
}

#[must_use]
pub fn execute_swap(params: &ProtocolParams, ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    if state.lane_count() < 2 {
        state.log(Some(ctx.owner()), Some(ctx.source_card()), "Swap: not enough protocols");
        return EffectOutcome::noop(state);
    }
    let target = side_player(ctx, params.target);
    let prompt = ctx.prompt(PromptKind::SwapProtocols { target });
    EffectOutcome::prompt(state, prompt)
}

/// Is `order` a reordering of `target`'s current protocols?
#[must_use]
pub fn is_permutation(state: &MatchState, target: PlayerId, order: &[String]) -> bool {
    let mut current: Vec<&str> = state.player(target).protocols().collect();
    let mut proposed: Vec<&str> = order.iter().map(String::as_str).collect();
    current.sort_unstable();
    proposed.sort_unstable();
    current == proposed
}

/// Put `target`'s protocols in the given order.
#[must_use]
pub fn on_order(ctx: &EffectContext<'_>, mut state: MatchState, target: PlayerId, order: &[String]) -> EffectOutcome {
    if !is_permutation(&state, target, order) {
        tracing::warn!(%target, ?order, "protocol order is not a permutation");
        return EffectOutcome::noop(state);
    }
    let previous: Vec<(String, bool)> = state
        .player(target)
        .lanes
        .iter()
        .map(|lane| (lane.protocol.clone(), lane.compiled))
        .collect();
    if previous.iter().map(|(name, _)| name).eq(order.iter()) {
        state.log(Some(ctx.owner()), Some(ctx.source_card()), "Rearrange: order unchanged");
        return EffectOutcome::done(state);
    }

    // Each name takes its compiled flag along. Duplicate names are consumed in order.
    let mut pool = previous;
    for (lane, name) in order.iter().enumerate() {
        let Some(at) = pool.iter().position(|(n, _)| n == name) else {
            continue;
        };
        let (protocol, compiled) = pool.remove(at);
        let slot = state.lane_mut(target, lane);
        slot.protocol = protocol;
        slot.compiled = compiled;
    }
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("rearranges {target}'s protocols to {}", order.join(", ")),
    );
    EffectOutcome::done(state)
}

/// Swap the protocols of lanes `a` and `b` on `target`'s side.
#[must_use]
pub fn on_swap(ctx: &EffectContext<'_>, mut state: MatchState, target: PlayerId, a: usize, b: usize) -> EffectOutcome {
    let lanes = state.lane_count();
    if a == b || a >= lanes || b >= lanes {
        tracing::warn!(%target, a, b, "invalid protocol swap");
        return EffectOutcome::noop(state);
    }
    let first = state.lane(target, a);
    let (protocol_a, compiled_a) = (first.protocol.clone(), first.compiled);
    let second = state.lane(target, b);
    let (protocol_b, compiled_b) = (second.protocol.clone(), second.compiled);

    let slot = state.lane_mut(target, a);
    slot.protocol = protocol_b.clone();
    slot.compiled = compiled_b;
    let slot = state.lane_mut(target, b);
    slot.protocol = protocol_a.clone();
    slot.compiled = compiled_a;

    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("swaps {target}'s {protocol_a} and {protocol_b}"),
    );
    EffectOutcome::done(state)
}
