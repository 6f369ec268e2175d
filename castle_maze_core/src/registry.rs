use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Position;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No item is registered at {position}")]
    NoItem { position: Position },
    #[error("No door challenge is registered at {position}")]
    NoChallenge { position: Position },
}

/// Labels of the items lying on the plan, keyed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRegistry {
    labels: HashMap<Position, String>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a label, returning the one it replaced, if any.
    pub fn insert(&mut self, position: Position, label: impl Into<String>) -> Option<String> {
        self.labels.insert(position, label.into())
    }

    pub fn lookup(&self, position: Position) -> Option<&str> {
        self.labels.get(&position).map(String::as_str)
    }

    /// Removes and returns the label at `position`.
    ///
    /// Each item can be consumed once; a second call fails with
    /// [`RegistryError::NoItem`].
    pub fn consume(&mut self, position: Position) -> Result<String, RegistryError> {
        self.labels
            .remove(&position)
            .ok_or(RegistryError::NoItem { position })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.labels.keys().copied()
    }
}

impl FromIterator<(Position, String)> for ItemRegistry {
    fn from_iter<I: IntoIterator<Item = (Position, String)>>(iter: I) -> Self {
        ItemRegistry {
            labels: iter.into_iter().collect(),
        }
    }
}

/// The question guarding a door and the answer that opens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub prompt: String,
    pub answer: String,
}

impl Challenge {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Challenge {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DoorEntry {
    challenge: Challenge,
    resolved: bool,
}

/// Door challenges keyed by position.
///
/// Entries are kept for the whole session; an opened door is only marked as
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorRegistry {
    doors: HashMap<Position, DoorEntry>,
}

impl DoorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an unresolved challenge, returning the one it replaced, if any.
    pub fn insert(&mut self, position: Position, challenge: Challenge) -> Option<Challenge> {
        self.doors
            .insert(
                position,
                DoorEntry {
                    challenge,
                    resolved: false,
                },
            )
            .map(|entry| entry.challenge)
    }

    pub fn lookup(&self, position: Position) -> Option<&Challenge> {
        self.doors.get(&position).map(|entry| &entry.challenge)
    }

    pub fn is_resolved(&self, position: Position) -> bool {
        self.doors
            .get(&position)
            .is_some_and(|entry| entry.resolved)
    }

    /// Checks `supplied` against the stored answer of the door at `position`.
    ///
    /// The comparison is exact: case-sensitive and without trimming. Returns
    /// `Ok(true)` and marks the door resolved only if the answer matches and
    /// the door was still unresolved.
    pub fn attempt(&mut self, position: Position, supplied: &str) -> Result<bool, RegistryError> {
        let entry = self
            .doors
            .get_mut(&position)
            .ok_or(RegistryError::NoChallenge { position })?;
        if entry.resolved || entry.challenge.answer != supplied {
            return Ok(false);
        }
        entry.resolved = true;
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.doors.keys().copied()
    }
}

impl FromIterator<(Position, Challenge)> for DoorRegistry {
    fn from_iter<I: IntoIterator<Item = (Position, Challenge)>>(iter: I) -> Self {
        let mut registry = DoorRegistry::new();
        for (position, challenge) in iter {
            registry.insert(position, challenge);
        }
        registry
    }
}
