#![allow(dead_code)]

use std::collections::VecDeque;

use castle_maze_core::{CellType, DoorAnswer, InputProvider, Position, Renderer};

/// Everything a session told the front end, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Cell(Position, CellType),
    Announcement(String),
    Inventory(String, usize),
    Player(Position),
    Win,
    Prompt(String),
}

/// A front end that answers door prompts from a script and records events.
///
/// When the script runs out every prompt is cancelled.
#[derive(Debug, Default)]
pub struct Scripted {
    pub answers: VecDeque<DoorAnswer>,
    pub events: Vec<Event>,
}

impl Scripted {
    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scripted {
            answers: answers
                .into_iter()
                .map(|a| DoorAnswer::Answer(a.into()))
                .collect(),
            events: Vec::new(),
        }
    }

    pub fn prompts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Prompt(_)))
            .count()
    }
}

impl Renderer for Scripted {
    fn on_cell_changed(&mut self, position: Position, cell: CellType) {
        self.events.push(Event::Cell(position, cell));
    }
    fn on_announcement(&mut self, text: &str) {
        self.events.push(Event::Announcement(text.to_string()));
    }
    fn on_inventory_appended(&mut self, label: &str, index: usize) {
        self.events.push(Event::Inventory(label.to_string(), index));
    }
    fn on_player_moved(&mut self, position: Position) {
        self.events.push(Event::Player(position));
    }
    fn on_win(&mut self) {
        self.events.push(Event::Win);
    }
}

impl InputProvider for Scripted {
    fn request_door_answer(&mut self, prompt: &str) -> DoorAnswer {
        self.events.push(Event::Prompt(prompt.to_string()));
        self.answers.pop_front().unwrap_or(DoorAnswer::Cancelled)
    }
}
