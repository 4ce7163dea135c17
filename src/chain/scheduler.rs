//! The effect chain scheduler.
//!
//! Runs queued entries one at a time until the chain drains or an effect
//! needs input.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──run──▶ Running ──prompt──▶ Suspended ──resume──▶ Running ──drained──▶ Idle
//! ```
//!
//! For each entry the scheduler:
//!
//! 1. checks its precondition: an optional entry that cannot execute is
//!    dropped silently, a mandatory one becomes a logged no-op;
//! 2. runs the executor and folds the outcome into the entry's progress;
//! 3. on a prompt, stores it in the state and returns [`Resolution::Suspended`];
//! 4. once finished, queues spawned options and the conditional follow-up at
//!    the front, then lets reactive triggers interrupt the rest of the chain.
//!
//! The scheduler never fails. Bad input at [`SuspendedMatch::resume`] is
//! rejected and leaves the prompt open.
//!
//! ## Example
//!
//! ```
//! use compile_ccg::chain::{ChainEntry, Choice, EffectScheduler, Resolution};
//! use compile_ccg::core::{CardId, MatchState, PlayerId, RulesConfig};
//! use compile_ccg::effects::{
//!     CountSpec, DiscardParams, DrawParams, EffectAction, EffectDefinition, Side,
//! };
//!
//! let mut state = MatchState::new(RulesConfig::default(), 3);
//! let cards: Vec<_> = (0..6).map(|v| state.new_card("Fire", v % 3)).collect();
//! state.stack_deck(PlayerId::FIRST, cards);
//! state.draw(PlayerId::FIRST, 3);
//!
//! // "Discard 1. If you do, draw 2."
//! let def = EffectDefinition::new(EffectAction::Discard(DiscardParams {
//!     count: Some(CountSpec::fixed(1)),
//!     actor: Side::Own,
//!     ..DiscardParams::default()
//! }))
//! .if_executed(EffectDefinition::new(EffectAction::Draw(DrawParams {
//!     count: Some(CountSpec::fixed(2)),
//!     ..DrawParams::default()
//! })));
//! EffectScheduler::enqueue(&mut state, ChainEntry::new(def, CardId(99), 0, PlayerId::FIRST));
//!
//! let Resolution::Suspended(suspended) = EffectScheduler::run(state) else {
//!     panic!("discard should ask which card");
//! };
//! let card = suspended.state().player(PlayerId::FIRST).hand[0].id;
//! let resolution = suspended.resume(Choice::Cards(vec![card]));
//!
//! assert!(!resolution.is_suspended());
//! assert_eq!(resolution.state().hand_size(PlayerId::FIRST), 4);
//! ```

use crate::core::{CardId, EngineError, MatchState, PlayerId};
use crate::effects::executors::{self, place_card, play_lanes};
use crate::effects::{modifiers, precondition, EffectContext, EffectOutcome, PlayDestination};
use crate::triggers::{collect_phase_effects, collect_reactive, GameEvent, Phase};

use super::{conditional, resolution, ActionRequired, ChainEntry, Choice};

/// Where a scheduler run stopped.
#[derive(Clone, Debug)]
pub enum Resolution {
    /// The chain drained.
    Idle(MatchState),
    /// An effect is waiting for input.
    Suspended(SuspendedMatch),
}

impl Resolution {
    /// Wrap a state, suspended if it carries an outstanding prompt.
    ///
    /// Use this to pick up a match restored from a snapshot.
    #[must_use]
    pub fn from_state(state: MatchState) -> Self {
        match state.action_required.clone() {
            Some(prompt) => Self::Suspended(SuspendedMatch { state, prompt }),
            None => Self::Idle(state),
        }
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        match self {
            Self::Idle(state) => state,
            Self::Suspended(suspended) => &suspended.state,
        }
    }

    #[must_use]
    pub fn into_state(self) -> MatchState {
        match self {
            Self::Idle(state) => state,
            Self::Suspended(suspended) => suspended.state,
        }
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended(_))
    }

    /// The outstanding prompt, if any.
    #[must_use]
    pub fn action_required(&self) -> Option<&ActionRequired> {
        match self {
            Self::Idle(_) => None,
            Self::Suspended(suspended) => Some(&suspended.prompt),
        }
    }

    /// The suspended match, if any.
    #[must_use]
    pub fn suspended(self) -> Option<SuspendedMatch> {
        match self {
            Self::Idle(_) => None,
            Self::Suspended(suspended) => Some(suspended),
        }
    }
}

/// A match waiting on exactly one prompt.
///
/// Only a suspended match can be resumed, so answering a prompt that does
/// not exist cannot be expressed.
#[derive(Clone, Debug)]
pub struct SuspendedMatch {
    state: MatchState,
    prompt: ActionRequired,
}

impl SuspendedMatch {
    #[must_use]
    pub fn action_required(&self) -> &ActionRequired {
        &self.prompt
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> MatchState {
        self.state
    }

    /// Check a choice without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the choice does not
    /// answer the prompt legally.
    pub fn validate(&self, choice: &Choice) -> Result<(), EngineError> {
        let entry = self
            .state
            .chain
            .current()
            .ok_or_else(|| EngineError::invalid("choice", "no effect is waiting for input"))?;
        resolution::validate(&self.state, &self.prompt, entry, choice)
    }

    /// Apply `choice` and keep running the chain.
    ///
    /// An invalid choice is logged and ignored: the match stays suspended on
    /// the same prompt.
    #[must_use]
    pub fn resume(self, choice: Choice) -> Resolution {
        if let Err(err) = self.validate(&choice) {
            tracing::warn!(%err, prompt = self.prompt.kind.name(), "rejected choice");
            return Resolution::Suspended(self);
        }
        let Self { mut state, prompt } = self;
        state.action_required = None;
        let Some(entry) = state.chain.current().cloned() else {
            return EffectScheduler::run(state);
        };
        tracing::debug!(
            source = %entry.source_card,
            prompt = prompt.kind.name(),
            ?choice,
            "chain resumed"
        );
        let outcome = resolution::apply_choice(state, &prompt, &entry, choice);
        EffectScheduler::run(EffectScheduler::absorb(outcome))
    }
}

/// Drives the effect chain stored in a [`MatchState`].
pub struct EffectScheduler;

impl EffectScheduler {
    /// Queue an entry at the back of the chain.
    pub fn enqueue(state: &mut MatchState, entry: ChainEntry) {
        state.chain.append(entry);
    }

    /// Queue several entries at the back, in order.
    pub fn enqueue_many(state: &mut MatchState, entries: impl IntoIterator<Item = ChainEntry>) {
        state.chain.append_many(entries);
    }

    /// Run until the chain drains or an effect needs input.
    #[must_use]
    pub fn run(mut state: MatchState) -> Resolution {
        if state.action_required.is_some() {
            return Resolution::from_state(state);
        }
        let mut steps = 0;
        loop {
            if state.chain.current().is_none()
                && state.chain.pop_next().is_none()
                && !state.chain.pop_interrupt()
            {
                return Resolution::Idle(state);
            }
            if state.chain.current().is_none() {
                // An interrupt level was restored with only pending entries.
                continue;
            }

            steps += 1;
            if steps > state.config.max_chain_steps {
                tracing::error!(steps, "chain step limit reached; discarding the rest of the chain");
                state.chain.clear();
                state.log(None, None, "The effect chain was cut short");
                return Resolution::Idle(state);
            }

            state = Self::execute_current(state);
            if let Some(prompt) = &state.action_required {
                tracing::debug!(actor = %prompt.actor, prompt = prompt.kind.name(), "chain suspended");
                return Resolution::from_state(state);
            }
        }
    }

    /// Play a card from hand as a turn action and run its triggers.
    ///
    /// # Errors
    ///
    /// Fails if an effect is waiting for input, the card is not in
    /// `player`'s hand, or it may not be played in `lane` with that face.
    pub fn play_card(
        mut state: MatchState,
        player: PlayerId,
        card: CardId,
        lane: usize,
        face_up: bool,
    ) -> Result<Resolution, EngineError> {
        if state.action_required.is_some() {
            return Err(EngineError::invalid("card to play", "an effect is waiting for input"));
        }
        let in_hand = state
            .player(player)
            .hand
            .iter()
            .find(|c| c.id == card)
            .ok_or(EngineError::UnknownCard(card))?;
        if !play_lanes(&state, lane, player, !face_up, PlayDestination::AnyLane, Some(in_hand)).contains(&lane) {
            return Err(EngineError::invalid("lane to play into", format!("{card} cannot go in lane {lane}")));
        }
        let played = state.take_from_hand(player, card).ok_or(EngineError::UnknownCard(card))?;
        let events = place_card(&mut state, player, lane, played, face_up);
        let side = if face_up { "face up" } else { "face down" };
        state.log(Some(player), Some(card), format!("plays {card} {side} in lane {lane}"));
        modifiers::recalculate(&mut state);

        Self::queue_reactive(&mut state, &events);
        Ok(Self::run(state))
    }

    /// Queue and run `player`'s start or end effects.
    ///
    /// A match waiting for input comes back untouched.
    #[must_use]
    pub fn run_phase(mut state: MatchState, player: PlayerId, phase: Phase) -> Resolution {
        if state.action_required.is_some() {
            tracing::warn!(%player, ?phase, "phase effects ignored while an effect is waiting for input");
            return Resolution::from_state(state);
        }
        let entries = collect_phase_effects(&state, player, phase);
        tracing::debug!(%player, ?phase, count = entries.len(), "phase effects queued");
        state.chain.append_many(entries);
        Self::run(state)
    }

    /// Report events that happened outside the chain (such as an
    /// end-of-turn cache clear) and run whatever they trigger.
    ///
    /// A match waiting for input comes back untouched: the pending prompt
    /// must be answered before anything else can interrupt the chain.
    #[must_use]
    pub fn fire_events(mut state: MatchState, events: &[GameEvent]) -> Resolution {
        if state.action_required.is_some() {
            tracing::warn!(count = events.len(), "events ignored while an effect is waiting for input");
            return Resolution::from_state(state);
        }
        Self::queue_reactive(&mut state, events);
        Self::run(state)
    }

    fn execute_current(mut state: MatchState) -> MatchState {
        let Some(entry) = state.chain.current().cloned() else {
            return state;
        };
        tracing::debug!(
            source = %entry.source_card,
            action = entry.definition.action_name(),
            depth = state.chain.depth(),
            "executing effect"
        );

        let check = precondition::check(&state, &entry);
        if !check.can_execute {
            let reason = check.skip_reason.map_or("cannot execute", |r| r.describe());
            if check.should_skip_silently(entry.definition.optional) {
                tracing::trace!(action = entry.definition.action_name(), reason, "optional effect skipped");
            } else {
                state.log(
                    Some(entry.owner),
                    Some(entry.source_card),
                    format!("{}: {reason}", title(entry.definition.action_name())),
                );
            }
            return Self::finish_current(state);
        }

        let outcome = executors::execute(&EffectContext::new(&entry), state);
        Self::absorb(outcome)
    }

    /// Fold an outcome into the current entry; suspend or finish it.
    fn absorb(outcome: EffectOutcome) -> MatchState {
        let EffectOutcome {
            mut state,
            action_required,
            executed,
            events,
            data,
            spawn,
        } = outcome;
        modifiers::recalculate(&mut state);

        if let Some(current) = state.chain.current_mut() {
            current.progress.executed |= executed;
            current.progress.events.extend(events);
            current.progress.spawn.extend(spawn);
            current.data.merge(data);
        }
        if action_required.is_some() {
            state.action_required = action_required;
            return state;
        }
        Self::finish_current(state)
    }

    fn finish_current(mut state: MatchState) -> MatchState {
        let Some(entry) = state.chain.take_current() else {
            return state;
        };
        if let Some(next) = conditional::follow_up(&entry) {
            state.chain.prepend(next);
        }
        for def in entry.progress.spawn.iter().rev() {
            state.chain.prepend(entry.derive(def.clone()));
        }
        Self::queue_reactive(&mut state, &entry.progress.events);
        state
    }

    /// Let the triggers `events` set off interrupt the rest of the chain.
    fn queue_reactive(state: &mut MatchState, events: &[GameEvent]) {
        let reactive = collect_reactive(state, events);
        if reactive.is_empty() {
            return;
        }
        if state.chain.depth() >= state.config.max_interrupt_depth {
            tracing::warn!(
                depth = state.chain.depth(),
                dropped = reactive.len(),
                "interrupt depth limit reached; reactive effects dropped"
            );
            state.log(None, None, "Reactive effects were dropped");
            return;
        }
        state.chain.push_interrupt();
        state.chain.append_many(reactive);
    }
}

/// "flip" -> "Flip"
fn title(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RulesConfig;
    use crate::effects::{
        CountSpec, DrawParams, EffectAction, EffectDefinition, FaceFilter, FlipParams, TargetFilter,
    };

    fn draw(n: i32) -> EffectDefinition {
        EffectDefinition::new(EffectAction::Draw(DrawParams {
            count: Some(CountSpec::fixed(n)),
            ..DrawParams::default()
        }))
    }

    fn with_deck(size: i32) -> MatchState {
        let mut state = MatchState::new(RulesConfig::default().without_reshuffle(), 1);
        let cards: Vec<_> = (0..size).map(|v| state.new_card("Fire", v % 6)).collect();
        state.stack_deck(PlayerId::FIRST, cards);
        state
    }

    #[test]
    fn test_title() {
        assert_eq!(title("flip"), "Flip");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_runs_fifo_to_idle() {
        let mut state = with_deck(5);
        EffectScheduler::enqueue_many(
            &mut state,
            [
                ChainEntry::new(draw(1), CardId(90), 0, PlayerId::FIRST),
                ChainEntry::new(draw(2), CardId(91), 1, PlayerId::FIRST),
            ],
        );
        let resolution = EffectScheduler::run(state);
        assert!(!resolution.is_suspended());
        let state = resolution.into_state();
        assert_eq!(state.hand_size(PlayerId::FIRST), 3);
        assert!(state.chain.is_empty());
    }

    #[test]
    fn test_optional_skip_is_silent() {
        let mut state = with_deck(0);
        let flip = EffectDefinition::new(EffectAction::Flip(FlipParams {
            filter: TargetFilter::any().with_face_state(FaceFilter::FaceDown),
            ..FlipParams::default()
        }))
        .optional();
        EffectScheduler::enqueue(&mut state, ChainEntry::new(flip, CardId(90), 0, PlayerId::FIRST));
        let resolution = EffectScheduler::run(state);
        assert!(resolution.action_required().is_none());
        assert_eq!(resolution.state().log_messages().count(), 0);
    }

    #[test]
    fn test_mandatory_failure_logs() {
        let mut state = with_deck(0);
        EffectScheduler::enqueue(&mut state, ChainEntry::new(draw(2), CardId(90), 0, PlayerId::FIRST));
        let state = EffectScheduler::run(state).into_state();
        assert!(state.log_messages().any(|m| m == "Draw: no cards to draw"));
    }

    #[test]
    fn test_step_limit_clears_chain() {
        let mut state = with_deck(10);
        state.config = state.config.clone().with_max_chain_steps(1);
        EffectScheduler::enqueue_many(
            &mut state,
            [
                ChainEntry::new(draw(1), CardId(90), 0, PlayerId::FIRST),
                ChainEntry::new(draw(1), CardId(91), 0, PlayerId::FIRST),
            ],
        );
        let state = EffectScheduler::run(state).into_state();
        assert_eq!(state.hand_size(PlayerId::FIRST), 1);
        assert!(state.chain.is_empty());
    }
}
