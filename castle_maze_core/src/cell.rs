use serde::{Deserialize, Serialize};

/// Represents the type of a square on the castle plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Corridor,
    Wall,
    Exit,
    Door,
    Item,
    /// A square the player has stood on and left. Walkable like a corridor.
    Visited,
}

impl CellType {
    pub const ALL: [CellType; 6] = [
        CellType::Corridor,
        CellType::Wall,
        CellType::Exit,
        CellType::Door,
        CellType::Item,
        CellType::Visited,
    ];

    /// Maps a plan file code (`0..=5`) to a cell type.
    pub fn from_code(code: u8) -> Option<CellType> {
        match code {
            0 => Some(CellType::Corridor),
            1 => Some(CellType::Wall),
            2 => Some(CellType::Exit),
            3 => Some(CellType::Door),
            4 => Some(CellType::Item),
            5 => Some(CellType::Visited),
            _ => None,
        }
    }

    /// The plan file code for this cell type.
    pub fn code(self) -> u8 {
        match self {
            CellType::Corridor => 0,
            CellType::Wall => 1,
            CellType::Exit => 2,
            CellType::Door => 3,
            CellType::Item => 4,
            CellType::Visited => 5,
        }
    }

    /// Whether overwriting `self` with `next` keeps the plan moving towards
    /// more open states.
    ///
    /// Walls never change. Doors and items may only open up into corridors
    /// (or be marked visited). Open cells never turn back into walls, doors
    /// or items.
    pub fn may_become(self, next: CellType) -> bool {
        if self == next {
            return true;
        }
        match self {
            CellType::Wall => false,
            CellType::Door | CellType::Item => {
                matches!(next, CellType::Corridor | CellType::Visited)
            }
            CellType::Corridor | CellType::Visited | CellType::Exit => {
                matches!(next, CellType::Corridor | CellType::Visited)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_plan_format() {
        for cell in CellType::ALL {
            assert_eq!(CellType::from_code(cell.code()), Some(cell));
        }
        assert_eq!(CellType::from_code(3), Some(CellType::Door));
        assert_eq!(CellType::from_code(6), None);
    }

    #[test]
    fn nothing_regresses_to_a_closed_state() {
        for from in CellType::ALL {
            for to in [CellType::Wall, CellType::Door, CellType::Item] {
                if from != to {
                    assert!(!from.may_become(to), "{from:?} -> {to:?}");
                }
            }
        }
        assert!(CellType::Door.may_become(CellType::Corridor));
        assert!(CellType::Item.may_become(CellType::Corridor));
        assert!(CellType::Exit.may_become(CellType::Visited));
        assert!(!CellType::Wall.may_become(CellType::Visited));
    }
}
