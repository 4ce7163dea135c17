//! Effect executors, one module per action kind.
//!
//! Every executor takes the context of the entry being run and the current
//! state by value, and hands back an [`EffectOutcome`]: the new state, and
//! optionally an [`ActionRequired`] when input is needed.
//!
//! ## Shapes
//!
//! - **Deterministic**: fixed draws, forced discards, "all" variants. The
//!   outcome is final.
//! - **Interactive**: the executor checks legality and returns a prompt.
//!   The chain stays suspended until the resolution step applies a choice
//!   through the `on_*` functions of the same module.
//!
//! ## Dispatch
//!
//! ```
//! use compile_ccg::chain::ChainEntry;
//! use compile_ccg::core::{CardId, MatchState, PlayerId, RulesConfig};
//! use compile_ccg::effects::{build_executor, CountSpec, DrawParams, EffectAction, EffectContext, EffectDefinition};
//!
//! let mut state = MatchState::new(RulesConfig::default(), 1);
//! let cards: Vec<_> = (0..5).map(|v| state.new_card("Fire", v)).collect();
//! state.stack_deck(PlayerId::FIRST, cards);
//!
//! let def = EffectDefinition::new(EffectAction::Draw(DrawParams {
//!     count: Some(CountSpec::fixed(3)),
//!     ..DrawParams::default()
//! }));
//! let entry = ChainEntry::new(def, CardId(99), 0, PlayerId::FIRST);
//! let executor = build_executor(&entry.definition.params);
//! let outcome = executor(&EffectContext::new(&entry), state);
//!
//! assert_eq!(outcome.state.hand_size(PlayerId::FIRST), 3);
//! assert_eq!(outcome.state.player(PlayerId::FIRST).deck.len(), 2);
//! ```
//!
//! [`ActionRequired`]: crate::chain::ActionRequired

pub mod choice;
pub mod delete;
pub mod discard;
pub mod draw;
pub mod flip;
pub mod modifier;
pub mod play;
pub mod protocols;
pub mod return_card;
pub mod reveal;
pub mod shift;
pub mod take;

use smallvec::SmallVec;

use super::context::{EffectContext, EffectOutcome};
use super::definition::{EffectAction, PlayDestination, ShiftDestination, Side};
use super::modifiers::{self, ProtectedAction};
use super::targeting::{TargetFilter, TargetQuery, TargetScope};
use crate::cards::Card;
use crate::chain::{BoardPurpose, PromptKind};
use crate::core::{CardId, CardLocation, MatchState, PlayerId};
use crate::triggers::GameEvent;

/// A boxed executor bound to its parameters.
pub type Executor<'a> = Box<dyn Fn(&EffectContext<'_>, MatchState) -> EffectOutcome + 'a>;

/// Bind an executor to an action's parameters.
///
/// Unknown actions get an executor that logs a warning and changes nothing.
#[must_use]
pub fn build_executor(action: &EffectAction) -> Executor<'_> {
    match action {
        EffectAction::Draw(p) => boxed(move |ctx, state| draw::execute(p, ctx, state)),
        EffectAction::Flip(p) => boxed(move |ctx, state| flip::execute(p, ctx, state)),
        EffectAction::Shift(p) => boxed(move |ctx, state| shift::execute(p, ctx, state)),
        EffectAction::Delete(p) => boxed(move |ctx, state| delete::execute(p, ctx, state)),
        EffectAction::Discard(p) => boxed(move |ctx, state| discard::execute(p, ctx, state)),
        EffectAction::Return(p) => boxed(move |ctx, state| return_card::execute(p, ctx, state)),
        EffectAction::Play(p) => boxed(move |ctx, state| play::execute(p, ctx, state)),
        EffectAction::Reveal(p) => boxed(move |ctx, state| reveal::execute_reveal(p, ctx, state)),
        EffectAction::Give(p) => boxed(move |ctx, state| reveal::execute_give(p, ctx, state)),
        EffectAction::Take(p) => boxed(move |ctx, state| take::execute(p, ctx, state)),
        EffectAction::RearrangeProtocols(p) => {
            boxed(move |ctx, state| protocols::execute_rearrange(p, ctx, state))
        }
        EffectAction::SwapProtocols(p) => {
            boxed(move |ctx, state| protocols::execute_swap(p, ctx, state))
        }
        EffectAction::ValueModifier(_) | EffectAction::PassiveRule(_) => {
            boxed(modifier::execute)
        }
        EffectAction::Choice(p) => boxed(move |ctx, state| choice::execute(p, ctx, state)),
        EffectAction::Unknown => boxed(|ctx, mut state| {
            tracing::warn!(source = %ctx.source_card(), "unknown effect action; skipping");
            state.log(Some(ctx.owner()), Some(ctx.source_card()), "Unknown effect; nothing happens");
            EffectOutcome::noop(state)
        }),
    }
}

fn boxed<'a, F>(executor: F) -> Executor<'a>
where
    F: Fn(&EffectContext<'_>, MatchState) -> EffectOutcome + 'a,
{
    Box::new(executor)
}

/// Run the entry's own action.
#[must_use]
pub fn execute(ctx: &EffectContext<'_>, state: MatchState) -> EffectOutcome {
    build_executor(&ctx.definition().params)(ctx, state)
}

/// The player a side refers to, from the effect owner's point of view.
#[must_use]
pub fn side_player(ctx: &EffectContext<'_>, side: Side) -> PlayerId {
    match side {
        Side::Own => ctx.owner(),
        Side::Opponent => ctx.opponent(),
    }
}

// === Board picks ===

/// What a board-card selection is for and what it may pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPick {
    pub purpose: BoardPurpose,
    pub filter: TargetFilter,
    pub scope: TargetScope,
    pub destination: Option<ShiftDestination>,
}

impl BoardPick {
    #[must_use]
    pub fn new(purpose: BoardPurpose, filter: TargetFilter, scope: TargetScope) -> Self {
        Self {
            purpose,
            filter,
            scope,
            destination: None,
        }
    }

    /// Set the shift destination (builder pattern).
    #[must_use]
    pub fn with_destination(mut self, destination: ShiftDestination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Rebuild a pick from a board-card prompt.
    #[must_use]
    pub fn from_prompt(kind: &PromptKind) -> Option<Self> {
        match kind {
            PromptKind::SelectBoardCard {
                purpose,
                filter,
                scope,
                destination,
                ..
            } => Some(Self {
                purpose: *purpose,
                filter: *filter,
                scope: *scope,
                destination: *destination,
            }),
            _ => None,
        }
    }

    /// The prompt asking for the next pick.
    #[must_use]
    pub fn prompt(&self, remaining: u32, chosen: SmallVec<[CardId; 4]>) -> PromptKind {
        PromptKind::SelectBoardCard {
            purpose: self.purpose,
            filter: self.filter,
            scope: self.scope,
            remaining,
            chosen,
            destination: self.destination,
        }
    }

    fn protection(&self) -> Option<ProtectedAction> {
        match self.purpose {
            BoardPurpose::Flip => Some(ProtectedAction::Flip),
            BoardPurpose::Shift => Some(ProtectedAction::Shift),
            BoardPurpose::Delete => Some(ProtectedAction::Delete),
            BoardPurpose::Return => Some(ProtectedAction::Return),
            BoardPurpose::Reveal => None,
        }
    }
}

/// Legal targets for a pick, in seat order, skipping `excluded`.
///
/// Beyond the filter and scope this drops protected cards, cards with no
/// lane to shift to, and face-up cards for reveals.
#[must_use]
pub fn board_candidates(
    state: &MatchState,
    ctx: &EffectContext<'_>,
    pick: &BoardPick,
    excluded: &[CardId],
) -> Vec<CardLocation> {
    let source_lane = ctx.lane();
    let legal = |loc: &CardLocation, card: &Card| {
        if pick
            .protection()
            .is_some_and(|action| modifiers::is_protected(state, loc, action))
        {
            return false;
        }
        match pick.purpose {
            BoardPurpose::Shift => {
                let destination = pick.destination.unwrap_or_default();
                !shift_lanes(state, loc, destination, source_lane).is_empty()
            }
            BoardPurpose::Reveal => !card.face_up,
            _ => true,
        }
    };
    TargetQuery::new(&pick.filter, ctx.owner())
        .source(ctx.source_card())
        .scoped(pick.scope, source_lane)
        .excluding(excluded)
        .matching(&legal)
        .find(state)
}

/// Ask for the next pick if any remain and a legal target exists; otherwise
/// hand `outcome` back as final.
#[must_use]
pub fn continue_pick(
    ctx: &EffectContext<'_>,
    outcome: EffectOutcome,
    pick: &BoardPick,
    remaining: u32,
    chosen: SmallVec<[CardId; 4]>,
) -> EffectOutcome {
    if outcome.is_suspended() || remaining == 0 {
        return outcome;
    }
    if board_candidates(&outcome.state, ctx, pick, &chosen).is_empty() {
        tracing::trace!(purpose = ?pick.purpose, remaining, "no more legal targets");
        return outcome;
    }
    let prompt = ctx.prompt(pick.prompt(remaining, chosen));
    EffectOutcome {
        action_required: Some(prompt),
        ..outcome
    }
}

/// Apply a pick to one chosen card.
#[must_use]
pub fn apply_pick(
    ctx: &EffectContext<'_>,
    state: MatchState,
    pick: &BoardPick,
    card: CardId,
) -> EffectOutcome {
    match pick.purpose {
        BoardPurpose::Flip => flip::on_card(ctx, state, card),
        BoardPurpose::Delete => delete::on_card(ctx, state, card),
        BoardPurpose::Return => return_card::on_card(ctx, state, card),
        BoardPurpose::Reveal => reveal::on_board_card(ctx, state, card),
        BoardPurpose::Shift => shift::on_card(ctx, state, card, pick.destination.unwrap_or_default()),
    }
}

/// Apply a pick to every legal target at once.
#[must_use]
pub fn apply_all(ctx: &EffectContext<'_>, state: MatchState, pick: &BoardPick) -> EffectOutcome {
    let targets = board_candidates(&state, ctx, pick, &[]);
    let mut outcome = EffectOutcome::noop(state);
    for target in targets {
        let step = apply_pick(ctx, outcome.state, pick, target.card);
        outcome = EffectOutcome {
            executed: outcome.executed || step.executed,
            events: outcome.events.into_iter().chain(step.events).collect(),
            data: step.data,
            ..step
        };
    }
    outcome
}

// === Lanes ===

/// Lanes a card at `location` may shift to.
#[must_use]
pub fn shift_lanes(
    state: &MatchState,
    location: &CardLocation,
    destination: ShiftDestination,
    source_lane: usize,
) -> SmallVec<[usize; 3]> {
    match destination {
        ShiftDestination::AnyOtherLane => (0..state.lane_count())
            .filter(|&lane| lane != location.lane)
            .collect(),
        ShiftDestination::SourceLane if location.lane != source_lane => {
            SmallVec::from_slice(&[source_lane])
        }
        ShiftDestination::SourceLane => SmallVec::new(),
    }
}

/// Lanes `player` may play a card into.
///
/// Face-down plays respect face-down blocks. A face-up play needs the card's
/// protocol to match the lane's protocol on either side.
#[must_use]
pub fn play_lanes(
    state: &MatchState,
    source_lane: usize,
    player: PlayerId,
    face_down: bool,
    destination: PlayDestination,
    card: Option<&Card>,
) -> SmallVec<[usize; 3]> {
    (0..state.lane_count())
        .filter(|&lane| match destination {
            PlayDestination::AnyLane => true,
            PlayDestination::OtherLanes | PlayDestination::EachOtherLane => lane != source_lane,
            PlayDestination::SourceLane => lane == source_lane,
        })
        .filter(|&lane| {
            if face_down {
                return !modifiers::face_down_play_blocked(state, player, lane);
            }
            card.map_or(true, |card| {
                state.lane(player, lane).protocol == card.protocol
                    || state.lane(player.opponent(), lane).protocol == card.protocol
            })
        })
        .collect()
}

/// Put a card on top of a lane and report what happened.
pub(crate) fn place_card(
    state: &mut MatchState,
    player: PlayerId,
    lane: usize,
    mut card: Card,
    face_up: bool,
) -> SmallVec<[GameEvent; 4]> {
    let id = card.id;
    card.face_up = face_up;
    let mut events = SmallVec::new();
    if let Some(covered) = state.place_on_lane(player, lane, card) {
        events.push(GameEvent::CardCovered {
            card: covered,
            owner: player,
            lane,
        });
    }
    events.push(GameEvent::CardPlayed {
        card: id,
        owner: player,
        lane,
        face_up,
    });
    events
}

/// Log and no-op when an effect's own card has left the board.
pub(crate) fn stale_source(ctx: &EffectContext<'_>, mut state: MatchState) -> EffectOutcome {
    tracing::warn!(source = %ctx.source_card(), action = ctx.definition().action_name(), "source card left the board");
    state.log(
        Some(ctx.owner()),
        Some(ctx.source_card()),
        format!("{}: {} is no longer on the board", ctx.definition().action_name(), ctx.source_card()),
    );
    EffectOutcome::noop(state)
}
