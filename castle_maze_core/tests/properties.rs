mod common;

use std::collections::HashSet;

use castle_maze_core::{
    CellType, Challenge, Direction, DoorAnswer, DoorOutcome, DoorRegistry, Grid, ItemRegistry,
    MoveOutcome, Position, Session,
};
use common::Scripted;
use proptest::prelude::*;

/// Builds a session from raw cell codes, labelling every item and guarding
/// every door with the answer "ok". The player starts on the first
/// corridor, exit or visited cell.
fn build(rows: usize, cols: usize, mut codes: Vec<u8>) -> Session {
    let start_index = match codes.iter().position(|&c| matches!(c, 0 | 2 | 5)) {
        Some(index) => index,
        None => {
            codes[0] = 0;
            0
        }
    };
    let cells: Vec<Vec<CellType>> = codes
        .chunks(cols)
        .map(|row| {
            row.iter()
                .map(|&c| CellType::from_code(c).unwrap())
                .collect()
        })
        .collect();
    let grid = Grid::from_rows(cells).unwrap();
    assert_eq!(grid.rows(), rows);

    let mut items = ItemRegistry::new();
    let mut doors = DoorRegistry::new();
    for (position, cell) in grid.enumerate() {
        match cell {
            CellType::Item => {
                items.insert(position, format!("item {position}"));
            }
            CellType::Door => {
                doors.insert(position, Challenge::new("password?", "ok"));
            }
            _ => {}
        }
    }
    let start = Position::new(start_index / cols, start_index % cols);
    Session::new(grid, items, doors, start).unwrap()
}

fn arb_plan() -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
    (1usize..7, 1usize..7).prop_flat_map(|(rows, cols)| {
        (
            Just(rows),
            Just(cols),
            prop::collection::vec(0u8..6, rows * cols),
        )
    })
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn arb_answer() -> impl Strategy<Value = DoorAnswer> {
    prop_oneof![
        Just(DoorAnswer::Answer("ok".to_string())),
        Just(DoorAnswer::Answer("OK".to_string())),
        Just(DoorAnswer::Cancelled),
    ]
}

fn arb_moves() -> impl Strategy<Value = Vec<(Direction, DoorAnswer)>> {
    prop::collection::vec((arb_direction(), arb_answer()), 0..60)
}

proptest! {
    #[test]
    fn move_sequences_uphold_the_invariants((rows, cols, codes) in arb_plan(), moves in arb_moves()) {
        let mut session = build(rows, cols, codes);
        let mut frontend = Scripted::default();
        let mut opened: HashSet<Position> = HashSet::new();

        for (direction, answer) in moves {
            let grid_before = session.grid().clone();
            let inventory_before = session.inventory().to_vec();
            let position_before = session.position();
            let won_before = session.is_won();
            let target = position_before.step(direction);

            frontend.answers.clear();
            frontend.answers.push_back(answer);
            let outcome = session.request_move(direction, &mut frontend).unwrap();

            prop_assert_ne!(session.grid()[session.position()], CellType::Wall);

            for ((_, before), after) in grid_before.enumerate().zip(session.grid().iter()) {
                prop_assert!(before.may_become(*after), "{:?} -> {:?}", before, after);
            }

            let grew = session.inventory().len() - inventory_before.len();
            match &outcome {
                MoveOutcome::MovedAndCollected(label) => {
                    prop_assert_eq!(grew, 1);
                    prop_assert_eq!(session.inventory().last(), Some(label));
                }
                _ => prop_assert_eq!(grew, 0),
            }
            prop_assert_eq!(&session.inventory()[..inventory_before.len()], &inventory_before[..]);

            if matches!(outcome, MoveOutcome::Blocked) {
                prop_assert_eq!(session.grid(), &grid_before);
                prop_assert_eq!(session.position(), position_before);
            }
            if !outcome.player_moved() {
                prop_assert_eq!(session.position(), position_before);
            }

            if won_before {
                prop_assert_eq!(&outcome, &MoveOutcome::Blocked);
            }
            prop_assert_eq!(session.is_won(), won_before || outcome == MoveOutcome::MovedAndWon);

            if let MoveOutcome::DoorChallenge(door) = outcome {
                let target = target.unwrap();
                prop_assert!(!opened.contains(&target));
                if door == DoorOutcome::Opened {
                    opened.insert(target);
                    prop_assert_eq!(session.position(), target);
                }
            }
        }
    }

    #[test]
    fn blocked_moves_send_no_notifications((rows, cols, codes) in arb_plan(), direction in arb_direction()) {
        let mut session = build(rows, cols, codes);
        let mut frontend = Scripted::default();
        if session.request_move(direction, &mut frontend).unwrap() == MoveOutcome::Blocked {
            prop_assert!(frontend.events.is_empty());
        }
    }
}
