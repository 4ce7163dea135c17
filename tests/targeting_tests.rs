//! Target resolution over realistic boards.

mod common;

use compile_ccg::core::{PlayerId, RulesConfig};
use compile_ccg::effects::{
    find_extreme_target, find_targets, has_targets, Extreme, FaceFilter, OwnerFilter, PositionFilter,
    TargetFilter, TargetQuery, TargetScope, ValueConstraint,
};

use common::Board;

/// Two cards per side in lane 0 and one elsewhere.
fn crowded() -> Board {
    let mut board = Board::new();
    board.face_up(PlayerId::SECOND, 2, 4);
    board.face_up(PlayerId::FIRST, 1, 4);
    board.face_up(PlayerId::FIRST, 0, 1);
    board.face_down(PlayerId::FIRST, 0, 6);
    board.face_up(PlayerId::SECOND, 0, 5);
    board.face_down(PlayerId::SECOND, 0, 0);
    board
}

#[test]
fn test_results_come_back_in_seat_order() {
    let board = crowded();
    let filter = TargetFilter::any().with_position(PositionFilter::Any);
    let found = find_targets(board.state(), &filter, PlayerId::SECOND, None, None);

    let order: Vec<_> = found.iter().map(|loc| (loc.owner, loc.lane, loc.index)).collect();
    assert_eq!(
        order,
        vec![
            (PlayerId::FIRST, 0, 0),
            (PlayerId::FIRST, 0, 1),
            (PlayerId::FIRST, 1, 0),
            (PlayerId::SECOND, 0, 0),
            (PlayerId::SECOND, 0, 1),
            (PlayerId::SECOND, 2, 0),
        ]
    );
}

#[test]
fn test_owner_is_relative_to_actor() {
    let board = crowded();
    let theirs = TargetFilter::any().with_owner(OwnerFilter::Opponent);

    let for_first = find_targets(board.state(), &theirs, PlayerId::FIRST, None, None);
    assert!(for_first.iter().all(|loc| loc.owner == PlayerId::SECOND));
    assert_eq!(for_first.len(), 2);

    let for_second = find_targets(board.state(), &theirs, PlayerId::SECOND, None, None);
    assert!(for_second.iter().all(|loc| loc.owner == PlayerId::FIRST));
}

#[test]
fn test_covered_only() {
    let board = crowded();
    let covered = TargetFilter::any().with_position(PositionFilter::Covered);
    let found = find_targets(board.state(), &covered, PlayerId::FIRST, None, None);
    let values: Vec<_> = found
        .iter()
        .map(|loc| board.state().card_at(loc).unwrap().value)
        .collect();
    assert_eq!(values, vec![1, 5]);
}

#[test]
fn test_face_down_counts_as_two() {
    let board = crowded();
    // Printed 6 and 0, both read as 2 while face down.
    let two = TargetFilter::any().with_value(ValueConstraint::Equals(2));
    let found = find_targets(board.state(), &two, PlayerId::FIRST, None, None);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|loc| !board.state().card_at(loc).unwrap().face_up));

    let six = TargetFilter::any().with_value(ValueConstraint::Equals(6));
    assert!(!has_targets(board.state(), &six, PlayerId::FIRST, None, None));
}

#[test]
fn test_configured_face_down_value() {
    let mut board = Board::with_config(RulesConfig::default().with_face_down_value(3));
    board.face_down(PlayerId::FIRST, 1, 0);
    let filter = TargetFilter::any().with_value(ValueConstraint::Range {
        min: Some(3),
        max: Some(3),
    });
    assert!(has_targets(board.state(), &filter, PlayerId::FIRST, None, None));
}

#[test]
fn test_extreme_ties_go_to_first_seen() {
    let board = crowded();
    let uncovered = TargetFilter::any();

    // Two uncovered 4s: first seat's lane 1 comes before second seat's lane 2.
    let highest_mine = find_extreme_target(
        board.state(),
        &uncovered.with_face_state(FaceFilter::FaceUp),
        PlayerId::FIRST,
        None,
        Extreme::Highest,
    )
    .unwrap();
    assert_eq!((highest_mine.owner, highest_mine.lane), (PlayerId::FIRST, 1));

    let lowest = find_extreme_target(board.state(), &uncovered, PlayerId::FIRST, None, Extreme::Lowest).unwrap();
    assert_eq!((lowest.owner, lowest.lane), (PlayerId::FIRST, 0));
    assert_eq!(board.state().card_at(&lowest).map(|c| c.value), Some(6));
}

#[test]
fn test_exclude_self() {
    let mut board = Board::new();
    let source = board.face_up(PlayerId::FIRST, 0, 3);
    let other = board.face_up(PlayerId::FIRST, 1, 3);

    let filter = TargetFilter::any().excluding_self();
    let found = find_targets(board.state(), &filter, PlayerId::FIRST, Some(source), None);
    assert_eq!(found.iter().map(|loc| loc.card).collect::<Vec<_>>(), vec![other]);
}

#[test]
fn test_scope_limits_lanes() {
    let board = crowded();
    let filter = TargetFilter::any();

    let here = find_targets(board.state(), &filter, PlayerId::FIRST, None, Some(0));
    assert!(here.iter().all(|loc| loc.lane == 0));
    assert_eq!(here.len(), 2);

    let elsewhere = TargetQuery::new(&filter, PlayerId::FIRST)
        .scoped(TargetScope::OtherLanes, 0)
        .find(board.state());
    assert_eq!(elsewhere.len(), 2);
    assert!(elsewhere.iter().all(|loc| loc.lane != 0));
}

#[test]
fn test_empty_board() {
    let board = Board::new();
    let filter = TargetFilter::any();
    assert!(find_targets(board.state(), &filter, PlayerId::FIRST, None, None).is_empty());
    assert!(find_extreme_target(board.state(), &filter, PlayerId::FIRST, None, Extreme::Highest).is_none());
}
