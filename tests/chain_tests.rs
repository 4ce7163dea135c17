//! Effect chain and scheduler integration tests.
//!
//! These drive whole effect sequences through `EffectScheduler`: FIFO order,
//! reactive interrupts, conditional follow-ups, suspension and resumption.

mod common;

use compile_ccg::chain::{ChainEntry, Choice, EffectChain, EffectScheduler, PromptKind, Resolution};
use compile_ccg::core::{CardId, EngineError, MatchState, PlayerId, RulesConfig};
use compile_ccg::effects::{
    ChoiceParams, CountSpec, DeleteParams, DiscardParams, DrawParams, EffectAction, EffectDefinition,
    EffectTrigger, FaceFilter, FlipParams, OwnerFilter, Side, TargetFilter,
};
use compile_ccg::triggers::{GameEvent, Phase};

use common::{entry, Board, NO_SOURCE};

fn draw(n: i32) -> EffectDefinition {
    EffectDefinition::new(EffectAction::Draw(DrawParams {
        count: Some(CountSpec::fixed(n)),
        ..DrawParams::default()
    }))
}

fn draw_for(side: Side, n: i32) -> EffectDefinition {
    EffectDefinition::new(EffectAction::Draw(DrawParams {
        count: Some(CountSpec::fixed(n)),
        target: side,
    }))
}

fn discard(n: i32, up_to: bool) -> EffectDefinition {
    EffectDefinition::new(EffectAction::Discard(DiscardParams {
        count: Some(CountSpec::fixed(n)),
        up_to,
        ..DiscardParams::default()
    }))
}

fn draw_lines(state: &MatchState) -> Vec<(Option<PlayerId>, String)> {
    state
        .log
        .iter()
        .filter(|e| e.message.starts_with("draws"))
        .map(|e| (e.player, e.message.clone()))
        .collect()
}

fn run(state: MatchState, entries: impl IntoIterator<Item = ChainEntry>) -> Resolution {
    let mut state = state;
    EffectScheduler::enqueue_many(&mut state, entries);
    EffectScheduler::run(state)
}

// =============================================================================
// Chain primitives
// =============================================================================

#[test]
fn test_push_pop_interrupt_round_trip() {
    let a = entry(draw(1), CardId(1), 0, PlayerId::FIRST);
    let b = entry(draw(2), CardId(2), 1, PlayerId::FIRST);

    let mut chain = EffectChain::new();
    chain.append_many([a.clone(), b.clone()]);

    assert!(chain.push_interrupt());
    assert_eq!(chain.pending_len(), 0);
    assert_eq!(chain.interrupts().len(), 1);
    assert_eq!(chain.interrupts()[0].pending, [a.clone(), b.clone()]);
    assert!(chain.has_pending());

    assert!(chain.pop_interrupt());
    assert_eq!(chain.pending().cloned().collect::<Vec<_>>(), vec![a, b]);
    assert_eq!(chain.depth(), 0);
}

#[test]
fn test_empty_push_saves_nothing() {
    let mut chain = EffectChain::new();
    assert!(!chain.push_interrupt());
    assert_eq!(chain.depth(), 0);
    assert!(!chain.pop_interrupt());
    assert!(chain.is_empty());
}

// =============================================================================
// Scheduling
// =============================================================================

#[test]
fn test_draw_three_from_five() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    let state = run(board.build(), [entry(draw(3), NO_SOURCE, 0, PlayerId::FIRST)]).into_state();

    assert_eq!(state.hand_size(PlayerId::FIRST), 3);
    assert_eq!(state.player(PlayerId::FIRST).deck.len(), 2);
}

#[test]
fn test_count_face_down_draw() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 10);
    board.face_down(PlayerId::FIRST, 0, 1);
    board.face_down(PlayerId::FIRST, 2, 5);
    board.face_down(PlayerId::SECOND, 1, 3);
    board.face_down(PlayerId::SECOND, 1, 4);
    board.face_up(PlayerId::SECOND, 2, 2);

    let def = EffectDefinition::new(EffectAction::Draw(DrawParams {
        count: Some(CountSpec::CountFaceDown { this_lane_only: false }),
        ..DrawParams::default()
    }));
    let state = run(board.build(), [entry(def, NO_SOURCE, 0, PlayerId::FIRST)]).into_state();
    assert_eq!(state.hand_size(PlayerId::FIRST), 4);
}

#[test]
fn test_reactive_effects_interrupt_the_chain() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    board.deck(PlayerId::SECOND, 5);
    board.custom(PlayerId::SECOND, 0, |card| {
        card.with_middle(draw(1).with_trigger(EffectTrigger::AfterOpponentDraw))
    });

    let state = run(
        board.build(),
        [
            entry(draw(1), NO_SOURCE, 0, PlayerId::FIRST),
            entry(draw(1), NO_SOURCE, 1, PlayerId::FIRST),
        ],
    )
    .into_state();

    let line = |player| (Some(player), "draws 1 card".to_string());
    assert_eq!(
        draw_lines(&state),
        vec![
            line(PlayerId::FIRST),
            line(PlayerId::SECOND),
            line(PlayerId::FIRST),
            line(PlayerId::SECOND),
        ]
    );
    assert!(state.chain.is_empty());
}

#[test]
fn test_interrupt_depth_limit_drops_reactions() {
    let mut board = Board::with_config(RulesConfig::default().with_max_interrupt_depth(0));
    board.deck(PlayerId::FIRST, 5);
    board.deck(PlayerId::SECOND, 5);
    board.custom(PlayerId::SECOND, 0, |card| {
        card.with_middle(draw(1).with_trigger(EffectTrigger::AfterOpponentDraw))
    });

    let state = run(board.build(), [entry(draw(1), NO_SOURCE, 0, PlayerId::FIRST)]).into_state();
    assert_eq!(state.hand_size(PlayerId::SECOND), 0);
    assert!(state.log_messages().any(|m| m == "Reactive effects were dropped"));
}

// =============================================================================
// Conditional follow-ups
// =============================================================================

#[test]
fn test_if_executed_sees_discarded_count() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    let hand = board.hand(PlayerId::FIRST, &[1, 2]);

    let follow = EffectDefinition::new(EffectAction::Draw(DrawParams {
        count: Some(CountSpec::EqualToDiscarded { offset: 1 }),
        ..DrawParams::default()
    }));
    let def = discard(1, false).if_executed(follow);
    let resolution = run(board.build(), [entry(def, NO_SOURCE, 0, PlayerId::FIRST)]);

    let suspended = resolution.suspended().expect("discard prompts");
    let prompt = suspended.action_required();
    assert_eq!(prompt.actor, PlayerId::FIRST);
    assert_eq!(prompt.follow_up.as_ref().map(|d| d.action_name()), Some("draw"));

    let state = suspended.resume(Choice::Cards(vec![hand[0]])).into_state();
    assert_eq!(state.hand_size(PlayerId::FIRST), 3);
    assert_eq!(state.player(PlayerId::FIRST).discard.len(), 1);
}

#[test]
fn test_if_executed_dropped_when_skipped() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    board.hand(PlayerId::FIRST, &[1, 2]);

    let def = discard(1, true).if_executed(draw(2));
    let suspended = run(board.build(), [entry(def, NO_SOURCE, 0, PlayerId::FIRST)])
        .suspended()
        .expect("up-to discard prompts");
    assert!(suspended.action_required().can_skip());

    let state = suspended.resume(Choice::Skip).into_state();
    assert_eq!(state.hand_size(PlayerId::FIRST), 2);
    assert_eq!(state.player(PlayerId::FIRST).deck.len(), 5);
}

#[test]
fn test_optional_discard_with_one_card_can_be_declined() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    let hand = board.hand(PlayerId::FIRST, &[3]);

    // "You may discard 1 card. If you do, draw 2 cards."
    let def = discard(1, false).optional().if_executed(draw(2));
    let state = board.build();
    let suspended = run(state.clone(), [entry(def.clone(), NO_SOURCE, 0, PlayerId::FIRST)])
        .suspended()
        .expect("optional discard prompts");
    assert!(suspended.action_required().can_skip());
    assert_eq!(suspended.state().hand_size(PlayerId::FIRST), 1);

    let declined = suspended.resume(Choice::Skip).into_state();
    assert_eq!(declined.hand_size(PlayerId::FIRST), 1);
    assert_eq!(declined.player(PlayerId::FIRST).deck.len(), 5);
    assert!(declined.player(PlayerId::FIRST).discard.is_empty());
    assert!(declined.action_required.is_none());

    let accepted = run(state, [entry(def, NO_SOURCE, 0, PlayerId::FIRST)])
        .suspended()
        .expect("optional discard prompts")
        .resume(Choice::Cards(vec![hand[0]]))
        .into_state();
    assert_eq!(accepted.hand_size(PlayerId::FIRST), 2);
    assert_eq!(accepted.player(PlayerId::FIRST).discard.len(), 1);
}

#[test]
fn test_then_runs_after_silent_optional_skip() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);

    let flip = EffectDefinition::new(EffectAction::Flip(FlipParams {
        filter: TargetFilter::any().with_face_state(FaceFilter::FaceDown),
        ..FlipParams::default()
    }))
    .optional()
    .then(draw(1));
    let resolution = run(board.build(), [entry(flip, NO_SOURCE, 0, PlayerId::FIRST)]);

    assert!(resolution.action_required().is_none());
    let state = resolution.into_state();
    assert_eq!(state.hand_size(PlayerId::FIRST), 1);
    assert!(!state.log_messages().any(|m| m.starts_with("Flip")));
}

#[test]
fn test_chosen_option_runs_before_follow_up() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    board.deck(PlayerId::SECOND, 5);

    let choice = EffectDefinition::new(EffectAction::Choice(ChoiceParams {
        options: vec![draw_for(Side::Own, 1), draw_for(Side::Opponent, 1)],
    }))
    .then(draw(2));
    let suspended = run(board.build(), [entry(choice, NO_SOURCE, 0, PlayerId::FIRST)])
        .suspended()
        .expect("choice prompts");
    assert!(matches!(
        &suspended.action_required().kind,
        PromptKind::ChooseOption { options } if options.len() == 2
    ));

    let state = suspended.resume(Choice::OptionIndex(1)).into_state();
    assert_eq!(
        draw_lines(&state),
        vec![
            (Some(PlayerId::SECOND), "draws 1 card".to_string()),
            (Some(PlayerId::FIRST), "draws 2 cards".to_string()),
        ]
    );
}

// =============================================================================
// Suspension
// =============================================================================

fn delete_one() -> EffectDefinition {
    EffectDefinition::new(EffectAction::Delete(DeleteParams {
        filter: TargetFilter::any().with_owner(OwnerFilter::Opponent),
        count: Some(CountSpec::fixed(1)),
        ..DeleteParams::default()
    }))
}

#[test]
fn test_invalid_choice_keeps_prompt_open() {
    let mut board = Board::new();
    let target = board.face_up(PlayerId::SECOND, 1, 4);
    let own = board.face_up(PlayerId::FIRST, 1, 2);

    let suspended = run(board.build(), [entry(delete_one(), own, 1, PlayerId::FIRST)])
        .suspended()
        .expect("delete prompts");
    let prompt = suspended.action_required().clone();

    // Own card is not a legal target.
    assert!(matches!(
        suspended.validate(&Choice::Card(own)),
        Err(EngineError::InvalidSelection { .. })
    ));
    let resolution = suspended.resume(Choice::Card(own));
    assert_eq!(resolution.action_required(), Some(&prompt));
    assert!(resolution.state().is_on_board(own));
    assert!(resolution.state().is_on_board(target));

    let suspended = resolution.suspended().expect("still suspended");
    let state = suspended.resume(Choice::Card(target)).into_state();
    assert!(!state.is_on_board(target));
    assert!(state.action_required.is_none());
}

#[test]
fn test_run_on_suspended_state_stays_suspended() {
    let mut board = Board::new();
    board.face_up(PlayerId::SECOND, 0, 4);
    let state = run(board.build(), [entry(delete_one(), NO_SOURCE, 0, PlayerId::FIRST)]).into_state();
    assert!(state.action_required.is_some());

    let resolution = EffectScheduler::run(state);
    assert!(resolution.is_suspended());
}

#[test]
fn test_events_wait_while_suspended() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    let hand = board.hand(PlayerId::FIRST, &[1, 2, 3]);
    board.custom(PlayerId::FIRST, 0, |card| {
        card.with_middle(draw(1).with_trigger(EffectTrigger::AfterClearCache))
    });
    board.custom(PlayerId::FIRST, 1, |card| {
        card.with_top(draw(1).with_trigger(EffectTrigger::Start))
    });
    let state = run(board.build(), [entry(discard(1, false), NO_SOURCE, 0, PlayerId::FIRST)]).into_state();
    let prompt = state.action_required.clone().expect("discard prompts");

    let fired = EffectScheduler::fire_events(state, &[GameEvent::CacheCleared { player: PlayerId::FIRST }]);
    assert_eq!(fired.action_required(), Some(&prompt));
    assert_eq!(fired.state().chain.depth(), 0);
    let phased = EffectScheduler::run_phase(fired.into_state(), PlayerId::FIRST, Phase::Start);
    assert_eq!(phased.action_required(), Some(&prompt));
    assert_eq!(phased.state().chain.pending_len(), 0);

    let suspended = phased.suspended().expect("still suspended");
    let choice = Choice::Cards(vec![hand[0]]);
    assert!(suspended.validate(&choice).is_ok());
    let state = suspended.resume(choice).into_state();
    assert!(state.action_required.is_none());
    assert_eq!(state.hand_size(PlayerId::FIRST), 2);
    assert_eq!(state.player(PlayerId::FIRST).discard.len(), 1);
    assert!(state.chain.is_empty());
}

// =============================================================================
// Turn actions
// =============================================================================

#[test]
fn test_play_card_fires_on_cover_then_on_play() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    board.custom(PlayerId::FIRST, 0, |card| {
        card.with_bottom(draw(1).with_trigger(EffectTrigger::OnCover))
    });
    let played = board.card("Fire", 3).with_middle(draw(2));
    let played = board.hand_card(PlayerId::FIRST, played);

    let state = EffectScheduler::play_card(board.build(), PlayerId::FIRST, played, 0, true)
        .unwrap()
        .into_state();

    assert_eq!(state.lane(PlayerId::FIRST, 0).top().map(|c| c.id), Some(played));
    assert_eq!(
        draw_lines(&state),
        vec![
            (Some(PlayerId::FIRST), "draws 1 card".to_string()),
            (Some(PlayerId::FIRST), "draws 2 cards".to_string()),
        ]
    );
}

#[test]
fn test_play_card_checks_protocol_for_face_up() {
    let mut board = Board::new();
    let hand = board.hand(PlayerId::FIRST, &[3, 4]);
    let state = board.build();

    // Lane 1 is Water / Light; the card is Fire.
    let err = EffectScheduler::play_card(state.clone(), PlayerId::FIRST, hand[0], 1, true).unwrap_err();
    assert!(matches!(err, EngineError::InvalidSelection { .. }));

    let state = EffectScheduler::play_card(state, PlayerId::FIRST, hand[0], 1, false)
        .unwrap()
        .into_state();
    assert!(!state.lane(PlayerId::FIRST, 1).top().unwrap().face_up);

    let err = EffectScheduler::play_card(state, PlayerId::FIRST, CardId(12_345), 0, false).unwrap_err();
    assert!(matches!(err, EngineError::UnknownCard(_)));
}

#[test]
fn test_start_phase_runs_only_active_player_effects() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 5);
    board.deck(PlayerId::SECOND, 5);
    board.custom(PlayerId::FIRST, 2, |card| {
        card.with_top(draw(1).with_trigger(EffectTrigger::Start))
    });
    board.custom(PlayerId::SECOND, 2, |card| {
        card.with_middle(draw(1).with_trigger(EffectTrigger::Start))
    });

    let state = EffectScheduler::run_phase(board.build(), PlayerId::FIRST, Phase::Start).into_state();
    assert_eq!(state.hand_size(PlayerId::FIRST), 1);
    assert_eq!(state.hand_size(PlayerId::SECOND), 0);
}
