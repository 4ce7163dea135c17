//! Executor flows driven through the scheduler.
//!
//! Each test builds a small board, queues one effect and answers its
//! prompts the way an input layer would.

mod common;

use smallvec::smallvec;

use compile_ccg::chain::{ChainEntry, Choice, EffectScheduler, HandPurpose, PromptKind, Resolution};
use compile_ccg::core::{MatchState, PlayerId, RulesConfig};
use compile_ccg::effects::modifiers::{self, ModifierScope, PassiveRule, ProtectedAction, ValueModifier};
use compile_ccg::effects::{
    CountSpec, DeleteParams, DrawParams, EffectAction, EffectDefinition, FaceFilter, FlipParams,
    OwnerFilter, PassiveRuleParams, PlayDestination, PlayParams, PlaySource, ReturnParams, ShiftParams,
    TakeParams, TargetFilter, ValueModifierParams,
};

use common::{entry, Board, NO_SOURCE};

fn run(state: MatchState, entry: ChainEntry) -> Resolution {
    let mut state = state;
    EffectScheduler::enqueue(&mut state, entry);
    EffectScheduler::run(state)
}

fn answer(resolution: Resolution, choice: Choice) -> Resolution {
    resolution
        .suspended()
        .expect("expected a prompt")
        .resume(choice)
}

fn opponent_cards() -> TargetFilter {
    TargetFilter::any().with_owner(OwnerFilter::Opponent)
}

// =============================================================================
// Draw
// =============================================================================

#[test]
fn test_draw_reshuffles_discard_pile() {
    let mut board = Board::new();
    for value in [1, 2] {
        let card = board.card("Fire", value);
        board.state_mut().discard_card(PlayerId::FIRST, card);
    }
    let def = EffectDefinition::new(EffectAction::Draw(DrawParams::default()));
    let state = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST)).into_state();

    let me = state.player(PlayerId::FIRST);
    assert_eq!(me.hand.len(), 1);
    assert_eq!(me.deck.len(), 1);
    assert!(me.discard.is_empty());
}

#[test]
fn test_draw_without_reshuffle_logs_failure() {
    let mut board = Board::with_config(RulesConfig::default().without_reshuffle());
    let card = board.card("Fire", 1);
    board.state_mut().discard_card(PlayerId::FIRST, card);

    let def = EffectDefinition::new(EffectAction::Draw(DrawParams::default()));
    let state = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST)).into_state();
    assert_eq!(state.hand_size(PlayerId::FIRST), 0);
    assert!(state.log_messages().any(|m| m == "Draw: no cards to draw"));
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_all_excluding_self_spares_source() {
    let mut board = Board::new();
    let source = board.face_up(PlayerId::FIRST, 0, 3);
    let others = [
        board.face_up(PlayerId::FIRST, 1, 1),
        board.face_up(PlayerId::SECOND, 0, 4),
        board.face_down(PlayerId::SECOND, 2, 6),
    ];

    let def = EffectDefinition::new(EffectAction::Delete(DeleteParams {
        filter: TargetFilter::any().excluding_self(),
        all: true,
        ..DeleteParams::default()
    }));
    let state = run(board.build(), entry(def, source, 0, PlayerId::FIRST)).into_state();

    assert!(state.is_on_board(source));
    for card in others {
        assert!(!state.is_on_board(card));
    }
    assert_eq!(state.player(PlayerId::SECOND).discard.len(), 2);
    assert_eq!(state.player(PlayerId::FIRST).discard.len(), 1);
}

#[test]
fn test_protected_cards_cannot_be_deleted() {
    let mut board = Board::new();
    let guard = board.custom(PlayerId::SECOND, 1, |card| {
        card.with_middle(EffectDefinition::new(EffectAction::PassiveRule(PassiveRuleParams {
            rule: PassiveRule::Protect {
                actions: smallvec![ProtectedAction::Delete],
                owner: OwnerFilter::Own,
                scope: ModifierScope::SourceLane,
            },
        })))
    });
    let def = EffectDefinition::new(EffectAction::Delete(DeleteParams {
        filter: opponent_cards(),
        count: Some(CountSpec::fixed(1)),
        ..DeleteParams::default()
    }));

    let resolution = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST));
    assert!(!resolution.is_suspended());
    let state = resolution.into_state();
    assert!(state.is_on_board(guard));
    assert!(state.log_messages().any(|m| m == "Delete: no valid targets"));
}

#[test]
fn test_lane_wide_delete_hits_both_sides() {
    let mut board = Board::new();
    let mine = board.face_up(PlayerId::FIRST, 2, 1);
    let theirs = board.face_up(PlayerId::SECOND, 2, 5);
    let elsewhere = board.face_up(PlayerId::SECOND, 0, 2);

    let def = EffectDefinition::new(EffectAction::Delete(DeleteParams {
        lane_wide: true,
        ..DeleteParams::default()
    }));
    let resolution = run(board.build(), entry(def, NO_SOURCE, 1, PlayerId::FIRST));
    let PromptKind::SelectLane { candidates, .. } = &resolution.action_required().unwrap().kind else {
        panic!("expected a lane prompt");
    };
    assert_eq!(candidates.as_slice(), &[0, 2]);

    let state = answer(resolution, Choice::Lane(2)).into_state();
    assert!(!state.is_on_board(mine));
    assert!(!state.is_on_board(theirs));
    assert!(state.is_on_board(elsewhere));
}

// =============================================================================
// Flip, shift, return
// =============================================================================

#[test]
fn test_multi_flip_can_stop_early() {
    let mut board = Board::new();
    let first = board.face_down(PlayerId::SECOND, 0, 3);
    let second = board.face_down(PlayerId::SECOND, 1, 4);

    let def = EffectDefinition::new(EffectAction::Flip(FlipParams {
        filter: opponent_cards().with_face_state(FaceFilter::FaceDown),
        count: Some(CountSpec::fixed(2)),
        ..FlipParams::default()
    }));
    let resolution = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST));
    let resolution = answer(resolution, Choice::Card(second));

    let PromptKind::SelectBoardCard { remaining, chosen, .. } = &resolution.action_required().unwrap().kind
    else {
        panic!("expected a second pick");
    };
    assert_eq!(*remaining, 1);
    assert_eq!(chosen.as_slice(), &[second]);

    let state = answer(resolution, Choice::Skip).into_state();
    let face_up = |id| state.board_card(id).map(|c| c.face_up);
    assert_eq!(face_up(second), Some(true));
    assert_eq!(face_up(first), Some(false));
}

#[test]
fn test_shift_asks_for_card_then_lane() {
    let mut board = Board::new();
    let target = board.face_up(PlayerId::SECOND, 1, 4);

    let def = EffectDefinition::new(EffectAction::Shift(ShiftParams {
        filter: opponent_cards(),
        ..ShiftParams::default()
    }));
    let resolution = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST));
    let resolution = answer(resolution, Choice::Card(target));

    let PromptKind::SelectShiftLane { card, candidates } = &resolution.action_required().unwrap().kind else {
        panic!("expected a lane prompt");
    };
    assert_eq!(*card, target);
    assert_eq!(candidates.as_slice(), &[0, 2]);

    let state = answer(resolution, Choice::Lane(2)).into_state();
    assert_eq!(state.lane(PlayerId::SECOND, 2).top().map(|c| c.id), Some(target));
    assert!(state.lane(PlayerId::SECOND, 1).cards.is_empty());
}

#[test]
fn test_return_sends_card_to_owner_hand() {
    let mut board = Board::new();
    let target = board.face_down(PlayerId::SECOND, 0, 5);

    let def = EffectDefinition::new(EffectAction::Return(ReturnParams {
        filter: opponent_cards(),
        count: Some(CountSpec::fixed(1)),
        ..ReturnParams::default()
    }));
    let resolution = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST));
    let state = answer(resolution, Choice::Card(target)).into_state();

    assert!(!state.is_on_board(target));
    assert!(state.in_hand(PlayerId::SECOND, target));
}

// =============================================================================
// Play and take
// =============================================================================

#[test]
fn test_play_face_down_from_hand() {
    let mut board = Board::new();
    let hand = board.hand(PlayerId::FIRST, &[2, 5]);

    let def = EffectDefinition::new(EffectAction::Play(PlayParams {
        face_down: true,
        ..PlayParams::default()
    }));
    let resolution = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST));
    assert!(matches!(
        resolution.action_required().unwrap().kind,
        PromptKind::SelectHandCards {
            purpose: HandPurpose::Play { face_down: true, .. },
            min: 1,
            max: 1,
        }
    ));

    let resolution = answer(resolution, Choice::Cards(vec![hand[1]]));
    let PromptKind::SelectPlayLane { card, candidates, .. } = &resolution.action_required().unwrap().kind else {
        panic!("expected a lane prompt");
    };
    assert_eq!(*card, hand[1]);
    assert_eq!(candidates.len(), 3);

    let state = answer(resolution, Choice::Lane(2)).into_state();
    let top = state.lane(PlayerId::FIRST, 2).top().unwrap();
    assert_eq!(top.id, hand[1]);
    assert!(!top.face_up);
    assert_eq!(state.hand_size(PlayerId::FIRST), 1);
}

#[test]
fn test_play_from_deck_into_each_other_lane() {
    let mut board = Board::new();
    board.deck(PlayerId::FIRST, 3);

    let def = EffectDefinition::new(EffectAction::Play(PlayParams {
        source: PlaySource::Deck,
        face_down: true,
        destination: PlayDestination::EachOtherLane,
        ..PlayParams::default()
    }));
    let state = run(board.build(), entry(def, NO_SOURCE, 1, PlayerId::FIRST)).into_state();

    assert_eq!(state.lane(PlayerId::FIRST, 0).cards.len(), 1);
    assert!(state.lane(PlayerId::FIRST, 1).cards.is_empty());
    assert_eq!(state.lane(PlayerId::FIRST, 2).cards.len(), 1);
    assert_eq!(state.player(PlayerId::FIRST).deck.len(), 1);
}

#[test]
fn test_take_one_at_a_time() {
    let mut board = Board::new();
    let theirs = board.hand(PlayerId::SECOND, &[1, 2, 3]);

    let def = EffectDefinition::new(EffectAction::Take(TakeParams {
        count: Some(CountSpec::fixed(2)),
        random: false,
    }));
    let resolution = run(board.build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST));
    let resolution = answer(resolution, Choice::Card(theirs[2]));
    assert!(matches!(
        resolution.action_required().unwrap().kind,
        PromptKind::SelectOpponentHandCard { remaining: 1 }
    ));

    let state = answer(resolution, Choice::Card(theirs[0])).into_state();
    assert!(state.in_hand(PlayerId::FIRST, theirs[0]));
    assert!(state.in_hand(PlayerId::FIRST, theirs[2]));
    assert_eq!(state.hand_size(PlayerId::SECOND), 1);
}

#[test]
fn test_random_take_is_seeded() {
    let build = || {
        let mut board = Board::new();
        board.hand(PlayerId::SECOND, &[1, 2, 3, 4, 5]);
        board.build()
    };
    let def = EffectDefinition::new(EffectAction::Take(TakeParams {
        count: Some(CountSpec::fixed(2)),
        random: true,
    }));

    let a = run(build(), entry(def.clone(), NO_SOURCE, 0, PlayerId::FIRST)).into_state();
    let b = run(build(), entry(def, NO_SOURCE, 0, PlayerId::FIRST)).into_state();
    assert_eq!(a.hand_size(PlayerId::FIRST), 2);
    assert_eq!(a.player(PlayerId::FIRST).hand, b.player(PlayerId::FIRST).hand);
}

// =============================================================================
// Modifiers
// =============================================================================

#[test]
fn test_face_down_value_modifier_changes_total() {
    let mut board = Board::new();
    board.face_up(PlayerId::FIRST, 0, 3);
    board.face_down(PlayerId::FIRST, 0, 5);
    assert_eq!(modifiers::lane_total(board.state(), PlayerId::FIRST, 0), 5);

    board.custom(PlayerId::FIRST, 0, |card| {
        card.with_middle(EffectDefinition::new(EffectAction::ValueModifier(ValueModifierParams {
            modifier: ValueModifier::FaceDownValue {
                value: 4,
                owner: OwnerFilter::Own,
                scope: ModifierScope::SourceLane,
            },
        })))
    });
    let state = board.build();
    assert_eq!(modifiers::lane_total(&state, PlayerId::FIRST, 0), 3 + 4 + 1);
    assert_eq!(modifiers::lane_total(&state, PlayerId::SECOND, 0), 0);
}
