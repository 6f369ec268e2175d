use castle_maze_core::{CellType, Grid, Position, Renderer, Session};
use tracing::warn;

/// What the screen shows, kept up to date from session notifications.
#[derive(Debug, Clone)]
pub struct Board {
    pub cells: Grid<CellType>,
    pub player: Position,
    pub banner: String,
    pub inventory: Vec<String>,
    pub won: bool,
}

impl Board {
    /// Takes the initial picture of a freshly created session.
    pub fn new(session: &Session) -> Self {
        Board {
            cells: session.grid().clone(),
            player: session.position(),
            banner: String::new(),
            inventory: session.inventory().to_vec(),
            won: session.is_won(),
        }
    }

    /// Inventory panel lines, numbered from one.
    pub fn inventory_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.inventory
            .iter()
            .enumerate()
            .map(|(index, label)| format!("No.{}: {}", index + 1, label))
    }
}

impl Renderer for Board {
    fn on_cell_changed(&mut self, position: Position, cell: CellType) {
        if let Err(err) = self.cells.set(position, cell) {
            warn!(error = %err, "cell change outside the board ignored");
        }
    }

    fn on_announcement(&mut self, text: &str) {
        self.banner = text.to_string();
    }

    fn on_inventory_appended(&mut self, label: &str, index: usize) {
        debug_assert_eq!(index, self.inventory.len());
        self.inventory.push(label.to_string());
    }

    fn on_player_moved(&mut self, position: Position) {
        self.player = position;
    }

    fn on_win(&mut self) {
        self.won = true;
    }
}
