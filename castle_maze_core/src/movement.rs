use serde::{Deserialize, Serialize};

use crate::{CellType, Direction, DoorRegistry, Grid, GridError, Position};

/// Result of a door challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorOutcome {
    Opened,
    /// Wrong answer or dismissed prompt. Nothing moved.
    Rejected,
}

/// Classification of a single move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Blocked,
    Moved,
    MovedAndCollected(String),
    MovedAndWon,
    DoorChallenge(DoorOutcome),
}

impl MoveOutcome {
    /// Whether the player ended up on a new cell.
    pub fn player_moved(&self) -> bool {
        match self {
            MoveOutcome::Blocked | MoveOutcome::DoorChallenge(DoorOutcome::Rejected) => false,
            MoveOutcome::Moved
            | MoveOutcome::MovedAndCollected(_)
            | MoveOutcome::MovedAndWon
            | MoveOutcome::DoorChallenge(DoorOutcome::Opened) => true,
        }
    }
}

/// What a move request resolves to before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Blocked(BlockReason),
    Walk(Position),
    Challenge(Position),
    Collect(Position),
    Exit(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockReason {
    GameWon,
    OutOfBounds,
    Wall,
}

/// Decides what a move from `from` in `direction` does.
///
/// The checks run in a fixed order: standing on the exit freezes play, then
/// the grid edge, then the type of the target cell. A door that has already
/// been resolved is treated like a corridor.
pub(crate) fn plan_step(
    grid: &Grid<CellType>,
    doors: &DoorRegistry,
    from: Position,
    direction: Direction,
) -> Result<Step, GridError> {
    if grid.cell_at(from)? == CellType::Exit {
        return Ok(Step::Blocked(BlockReason::GameWon));
    }
    let target = match from.step(direction) {
        Some(target) if grid.in_bounds(target) => target,
        _ => return Ok(Step::Blocked(BlockReason::OutOfBounds)),
    };
    let step = match grid.cell_at(target)? {
        CellType::Wall => Step::Blocked(BlockReason::Wall),
        CellType::Door if doors.is_resolved(target) => Step::Walk(target),
        CellType::Door => Step::Challenge(target),
        CellType::Corridor | CellType::Visited => Step::Walk(target),
        CellType::Item => Step::Collect(target),
        CellType::Exit => Step::Exit(target),
    };
    Ok(step)
}
