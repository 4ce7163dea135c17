//! Conditional follow-ups.
//!
//! An effect may carry `conditional: { type, then_effect }`. Once the effect
//! has fully resolved, `then` always queues the follow-up right behind it;
//! `if_executed` does so only if the effect actually did something. The
//! follow-up inherits the entry's context data, so "discard 1. If you do,
//! draw cards equal to the discarded count" sees the discard.

use crate::effects::ConditionalKind;

use super::ChainEntry;

/// The follow-up entry for a finished `entry`, if one should run.
///
/// `entry.data` and `entry.progress` must already hold the merged results of
/// every step the entry took.
#[must_use]
pub fn follow_up(entry: &ChainEntry) -> Option<ChainEntry> {
    let conditional = entry.definition.conditional.as_ref()?;
    let runs = match conditional.kind {
        ConditionalKind::Then => true,
        ConditionalKind::IfExecuted => entry.progress.executed,
    };
    if !runs {
        tracing::trace!(
            source = %entry.source_card,
            action = entry.definition.action_name(),
            "if_executed follow-up dropped"
        );
        return None;
    }
    let mut next = entry.derive((*conditional.then_effect).clone());
    next.conditional = Some(conditional.kind);
    Some(next)
}
