use tracing::{debug, info, warn};

use crate::{
    CellType, Direction, DoorAnswer, DoorOutcome, DoorRegistry, Grid, GridError, InputProvider,
    ItemRegistry, Messages, MoveOutcome, Position, RegistryError, Renderer,
    movement::{BlockReason, Step, plan_step},
};

/// Inconsistencies between the plan, the registries and the start position.
///
/// These are detected when the session is created and are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Start position {start} is out of bounds for a {rows}x{cols} plan")]
    StartOutOfBounds {
        start: Position,
        rows: usize,
        cols: usize,
    },
    #[error("Start position {start} is inside a wall")]
    StartOnWall { start: Position },
    #[error("Start position {start} is on a {cell:?} cell")]
    StartOnClosedCell { start: Position, cell: CellType },
    #[error("Item cell at {position} has no label in the item dictionary")]
    ItemWithoutLabel { position: Position },
    #[error("Door cell at {position} has no challenge in the door dictionary")]
    DoorWithoutChallenge { position: Position },
    #[error("Item dictionary entry at {position} does not match an item cell")]
    LabelWithoutItem { position: Position },
    #[error("Door dictionary entry at {position} does not match a door cell")]
    ChallengeWithoutDoor { position: Position },
    #[error("Dictionary entry at {position} is outside the {rows}x{cols} plan")]
    EntryOutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },
}

/// Broken internal invariant while processing a move.
///
/// A session built through [`Session::new`] never produces these for
/// ordinary input; blocked moves and rejected answers are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One playthrough: the plan, its registries, and the player.
///
/// All state changes go through [`Session::request_move`].
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid<CellType>,
    items: ItemRegistry,
    doors: DoorRegistry,
    position: Position,
    inventory: Vec<String>,
    won: bool,
    messages: Messages,
}

impl Session {
    /// Creates a session after checking that the plan and the registries
    /// agree with each other.
    ///
    /// Every `Item` cell needs a label and every `Door` cell a challenge;
    /// every dictionary entry must point at a cell of the matching type. The
    /// player may not start on a wall, door or item. A start position on the
    /// exit produces a session that is already won.
    pub fn new(
        grid: Grid<CellType>,
        items: ItemRegistry,
        doors: DoorRegistry,
        start: Position,
    ) -> Result<Self, ConfigError> {
        validate(&grid, &items, &doors, start)?;
        let won = grid[start] == CellType::Exit;
        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            items = items.len(),
            doors = doors.len(),
            %start,
            "session created"
        );
        Ok(Session {
            grid,
            items,
            doors,
            position: start,
            inventory: Vec::new(),
            won,
            messages: Messages::default(),
        })
    }

    /// Replaces the announcement texts.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Sends the opening announcement and the initial player position.
    pub fn start<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.on_announcement(&self.messages.intro);
        renderer.on_player_moved(self.position);
    }

    pub fn grid(&self) -> &Grid<CellType> {
        &self.grid
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn doors(&self) -> &DoorRegistry {
        &self.doors
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Processes one move request.
    ///
    /// Not re-entrant: the caller must not deliver another move until this
    /// returns. When the target is a closed door the call blocks inside
    /// [`InputProvider::request_door_answer`] until the player answers.
    ///
    /// Blocked moves leave every piece of state untouched and send no
    /// notifications.
    pub fn request_move<F>(
        &mut self,
        direction: Direction,
        frontend: &mut F,
    ) -> Result<MoveOutcome, EngineError>
    where
        F: Renderer + InputProvider + ?Sized,
    {
        let from = self.position;
        let outcome = match plan_step(&self.grid, &self.doors, from, direction)? {
            Step::Blocked(reason) => {
                log_block(direction, from, reason);
                MoveOutcome::Blocked
            }
            Step::Walk(target) => {
                self.advance(target, frontend)?;
                MoveOutcome::Moved
            }
            Step::Collect(target) => {
                let label = self.items.consume(target)?;
                self.advance(target, frontend)?;
                self.set_cell(target, CellType::Corridor, frontend)?;
                info!(%target, item = %label, "item collected");
                frontend.on_announcement(&self.messages.item_found(&label));
                self.inventory.push(label.clone());
                frontend.on_inventory_appended(&label, self.inventory.len() - 1);
                MoveOutcome::MovedAndCollected(label)
            }
            Step::Exit(target) => {
                self.advance(target, frontend)?;
                self.won = true;
                info!(%target, "exit reached");
                frontend.on_announcement(&self.messages.win);
                frontend.on_win();
                MoveOutcome::MovedAndWon
            }
            Step::Challenge(target) => {
                MoveOutcome::DoorChallenge(self.challenge_door(target, frontend)?)
            }
        };
        debug!(?direction, %from, to = %self.position, ?outcome, "move processed");
        Ok(outcome)
    }

    fn challenge_door<F>(
        &mut self,
        target: Position,
        frontend: &mut F,
    ) -> Result<DoorOutcome, EngineError>
    where
        F: Renderer + InputProvider + ?Sized,
    {
        let prompt = self
            .doors
            .lookup(target)
            .ok_or(RegistryError::NoChallenge { position: target })?
            .prompt
            .clone();
        frontend.on_announcement(&self.messages.door_closed);

        let answer = match frontend.request_door_answer(&prompt) {
            DoorAnswer::Answer(answer) => answer,
            DoorAnswer::Cancelled => {
                warn!(%target, "door challenge dismissed");
                frontend.on_announcement(&self.messages.no_response);
                return Ok(DoorOutcome::Rejected);
            }
        };

        if !self.doors.attempt(target, &answer)? {
            warn!(%target, "wrong answer at door");
            frontend.on_announcement(&self.messages.wrong_answer);
            return Ok(DoorOutcome::Rejected);
        }

        info!(%target, "door opened");
        frontend.on_announcement(&self.messages.door_opens);
        self.set_cell(target, CellType::Corridor, frontend)?;
        self.advance(target, frontend)?;
        Ok(DoorOutcome::Opened)
    }

    /// Marks the cell being left as visited and puts the player on `target`.
    fn advance<R: Renderer + ?Sized>(
        &mut self,
        target: Position,
        renderer: &mut R,
    ) -> Result<(), EngineError> {
        self.set_cell(self.position, CellType::Visited, renderer)?;
        self.position = target;
        renderer.on_player_moved(target);
        Ok(())
    }

    fn set_cell<R: Renderer + ?Sized>(
        &mut self,
        position: Position,
        cell: CellType,
        renderer: &mut R,
    ) -> Result<(), EngineError> {
        debug_assert!(self.grid.cell_at(position)?.may_become(cell));
        self.grid.set(position, cell)?;
        renderer.on_cell_changed(position, cell);
        Ok(())
    }
}

fn log_block(direction: Direction, from: Position, reason: BlockReason) {
    match reason {
        BlockReason::GameWon => debug!(?direction, %from, "move ignored, game already won"),
        BlockReason::OutOfBounds => debug!(?direction, %from, "move blocked by plan edge"),
        BlockReason::Wall => debug!(?direction, %from, "move blocked by wall"),
    }
}

fn validate(
    grid: &Grid<CellType>,
    items: &ItemRegistry,
    doors: &DoorRegistry,
    start: Position,
) -> Result<(), ConfigError> {
    let (rows, cols) = (grid.rows(), grid.cols());
    match grid.get(start) {
        None => return Err(ConfigError::StartOutOfBounds { start, rows, cols }),
        Some(CellType::Wall) => return Err(ConfigError::StartOnWall { start }),
        Some(&cell @ (CellType::Door | CellType::Item)) => {
            return Err(ConfigError::StartOnClosedCell { start, cell });
        }
        Some(_) => {}
    }

    for (position, cell) in grid.enumerate() {
        match cell {
            CellType::Item if items.lookup(position).is_none() => {
                return Err(ConfigError::ItemWithoutLabel { position });
            }
            CellType::Door if doors.lookup(position).is_none() => {
                return Err(ConfigError::DoorWithoutChallenge { position });
            }
            _ => {}
        }
    }

    let out_of_bounds = |position| ConfigError::EntryOutOfBounds {
        position,
        rows,
        cols,
    };

    // Sorted so the reported entry does not depend on hash order.
    let mut labelled: Vec<Position> = items.positions().collect();
    labelled.sort();
    for position in labelled {
        match grid.get(position) {
            None => return Err(out_of_bounds(position)),
            Some(CellType::Item) => {}
            Some(_) => return Err(ConfigError::LabelWithoutItem { position }),
        }
    }

    let mut guarded: Vec<Position> = doors.positions().collect();
    guarded.sort();
    for position in guarded {
        match grid.get(position) {
            None => return Err(out_of_bounds(position)),
            Some(CellType::Door) => {}
            Some(_) => return Err(ConfigError::ChallengeWithoutDoor { position }),
        }
    }
    Ok(())
}
