//! Collaborators the session talks to while processing a move.
//!
//! The session never reads anything back from the renderer. The only value
//! it receives from the outside world during a move is the answer to a door
//! challenge.

use crate::{CellType, Position};

/// Receives notifications about state changes so they can be drawn.
pub trait Renderer {
    fn on_cell_changed(&mut self, position: Position, cell: CellType);

    fn on_announcement(&mut self, text: &str);

    /// `index` is the zero-based slot of the new entry in the inventory.
    fn on_inventory_appended(&mut self, label: &str, index: usize);

    fn on_player_moved(&mut self, position: Position);

    fn on_win(&mut self);
}

/// What the player replied to a door challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorAnswer {
    Answer(String),
    Cancelled,
}

impl From<Option<String>> for DoorAnswer {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(answer) => DoorAnswer::Answer(answer),
            None => DoorAnswer::Cancelled,
        }
    }
}

/// Supplies answers to door challenges.
pub trait InputProvider {
    /// Shows `prompt` to the player and blocks until they answer or dismiss it.
    ///
    /// There is no timeout. The only way out besides an answer is
    /// [`DoorAnswer::Cancelled`].
    fn request_door_answer(&mut self, prompt: &str) -> DoorAnswer;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissed_prompt_maps_to_cancelled() {
        assert_eq!(DoorAnswer::from(None), DoorAnswer::Cancelled);
        assert_eq!(
            DoorAnswer::from(Some(String::new())),
            DoorAnswer::Answer(String::new())
        );
    }
}
