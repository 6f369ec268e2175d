//! Parsing of the castle plan and of the item and door dictionaries.
//!
//! The plan is one row per line of whitespace-separated cell codes.
//! Dictionary lines look like literal pairs:
//!
//! ```text
//! (12, 3), 'a golden key'
//! (5, 7), ("How many legs has a spider?", "8")
//! ```
//!
//! Strings may use single or double quotes; blank lines are skipped.

use std::{iter::Peekable, str::Chars};

use crate::{CellType, Challenge, DoorRegistry, Grid, GridError, ItemRegistry, Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Shape(#[from] GridError),
    #[error("Unknown cell code '{code}' at row {row}, column {col}")]
    UnknownCellCode {
        code: String,
        row: usize,
        col: usize,
    },
    #[error("{source_name}, line {line}: {reason}")]
    MalformedEntry {
        source_name: String,
        line: usize,
        reason: String,
    },
    #[error("{source_name}: position {position} is listed more than once")]
    DuplicateEntry {
        source_name: String,
        position: Position,
    },
}

/// Parses a plan into a grid of cell types.
pub fn parse_grid(text: &str) -> Result<Grid<CellType>, LoadError> {
    let mut rows = Vec::new();
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let row = rows.len();
        let cells = line
            .split_whitespace()
            .enumerate()
            .map(|(col, token)| {
                token
                    .parse::<u8>()
                    .ok()
                    .and_then(CellType::from_code)
                    .ok_or_else(|| LoadError::UnknownCellCode {
                        code: token.to_string(),
                        row,
                        col,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }
    Ok(Grid::from_rows(rows)?)
}

/// Parses an item dictionary. `source_name` is only used in error messages.
pub fn parse_items(text: &str, source_name: &str) -> Result<ItemRegistry, LoadError> {
    let mut items = ItemRegistry::new();
    for (line, (position, value)) in parse_entries(text, source_name)? {
        let label = match value {
            Literal::Str(label) => label,
            other => {
                return Err(malformed(
                    source_name,
                    line,
                    format!("expected an item label, found {}", other.describe()),
                ));
            }
        };
        if items.insert(position, label).is_some() {
            return Err(duplicate(source_name, position));
        }
    }
    Ok(items)
}

/// Parses a door dictionary of `(prompt, answer)` pairs.
pub fn parse_doors(text: &str, source_name: &str) -> Result<DoorRegistry, LoadError> {
    let mut doors = DoorRegistry::new();
    for (line, (position, value)) in parse_entries(text, source_name)? {
        let challenge = match value {
            Literal::Tuple(parts) => match <[Literal; 2]>::try_from(parts) {
                Ok([Literal::Str(prompt), Literal::Str(answer)]) => Challenge { prompt, answer },
                _ => {
                    return Err(malformed(
                        source_name,
                        line,
                        "expected a (prompt, answer) pair of strings".to_string(),
                    ));
                }
            },
            other => {
                return Err(malformed(
                    source_name,
                    line,
                    format!(
                        "expected a (prompt, answer) pair, found {}",
                        other.describe()
                    ),
                ));
            }
        };
        if doors.insert(position, challenge).is_some() {
            return Err(duplicate(source_name, position));
        }
    }
    Ok(doors)
}

fn malformed(source_name: &str, line: usize, reason: String) -> LoadError {
    LoadError::MalformedEntry {
        source_name: source_name.to_string(),
        line,
        reason,
    }
}

fn duplicate(source_name: &str, position: Position) -> LoadError {
    LoadError::DuplicateEntry {
        source_name: source_name.to_string(),
        position,
    }
}

/// A dictionary entry with its one-based line number.
type Entry = (usize, (Position, Literal));

fn parse_entries(text: &str, source_name: &str) -> Result<Vec<Entry>, LoadError> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let line = index + 1;
        let entry = parse_entry(raw).map_err(|reason| malformed(source_name, line, reason))?;
        entries.push((line, entry));
    }
    Ok(entries)
}

fn parse_entry(raw: &str) -> Result<(Position, Literal), String> {
    let mut parser = LiteralParser::new(raw);
    let mut values = parser.sequence(None)?;
    // An entry may also be wrapped in its own parentheses.
    if let [Literal::Tuple(_)] = values.as_slice()
        && let Some(Literal::Tuple(inner)) = values.pop()
    {
        values = inner;
    }
    let [key, value] = <[Literal; 2]>::try_from(values)
        .map_err(|values| format!("expected `position, value`, found {} items", values.len()))?;
    let position = match key {
        Literal::Tuple(coords) => match coords.as_slice() {
            [Literal::Int(row), Literal::Int(col)] => Position::new(*row, *col),
            _ => return Err("position must be a pair of non-negative integers".to_string()),
        },
        other => return Err(format!("expected a position, found {}", other.describe())),
    };
    Ok((position, value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Literal {
    Int(usize),
    Str(String),
    Tuple(Vec<Literal>),
}

impl Literal {
    fn describe(&self) -> &'static str {
        match self {
            Literal::Int(_) => "an integer",
            Literal::Str(_) => "a string",
            Literal::Tuple(_) => "a tuple",
        }
    }
}

struct LiteralParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> LiteralParser<'a> {
    fn new(text: &'a str) -> Self {
        LiteralParser {
            chars: text.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    /// Reads comma-separated literals until `close` (or the end of input
    /// when `close` is `None`). A trailing comma is allowed.
    fn sequence(&mut self, close: Option<char>) -> Result<Vec<Literal>, String> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match (self.chars.peek().copied(), close) {
                (None, None) => return Ok(items),
                (None, Some(c)) => return Err(format!("missing closing '{c}'")),
                (Some(c), Some(expected)) if c == expected => {
                    self.chars.next();
                    return Ok(items);
                }
                _ => {}
            }
            items.push(self.literal()?);
            self.skip_whitespace();
            match (self.chars.peek().copied(), close) {
                (Some(','), _) => {
                    self.chars.next();
                }
                (None, None) => return Ok(items),
                (Some(c), Some(expected)) if c == expected => {}
                (None, Some(c)) => return Err(format!("missing closing '{c}'")),
                (Some(c), _) => return Err(format!("unexpected character '{c}'")),
            }
        }
    }

    fn literal(&mut self) -> Result<Literal, String> {
        match self.chars.peek().copied() {
            Some('(') => {
                self.chars.next();
                Ok(Literal::Tuple(self.sequence(Some(')'))?))
            }
            Some(quote @ ('\'' | '"')) => {
                self.chars.next();
                self.string(quote).map(Literal::Str)
            }
            Some(c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(d) = self.chars.next_if(char::is_ascii_digit) {
                    digits.push(d);
                }
                digits
                    .parse()
                    .map(Literal::Int)
                    .map_err(|_| format!("integer '{digits}' is too large"))
            }
            Some(c) => Err(format!("unexpected character '{c}'")),
            None => Err("unexpected end of line".to_string()),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, String> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err("unterminated string".to_string()),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(escaped @ ('\\' | '\'' | '"')) => value.push(escaped),
                    // Unknown escapes are kept as written.
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err("unterminated string".to_string()),
                },
                Some(c) => value.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellType::*;

    #[test]
    fn grid_codes_are_mapped() {
        let grid = parse_grid("0 1 2\n3 4 5\n\n").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(
            grid.as_slice(),
            &[Corridor, Wall, Exit, Door, Item, Visited]
        );
    }

    #[test]
    fn grid_shape_errors_are_reported() {
        assert_eq!(parse_grid(""), Err(LoadError::Shape(GridError::Empty)));
        assert_eq!(
            parse_grid("0 0\n0\n"),
            Err(LoadError::Shape(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }))
        );
        assert_eq!(
            parse_grid("0 7"),
            Err(LoadError::UnknownCellCode {
                code: "7".into(),
                row: 0,
                col: 1
            })
        );
        assert!(matches!(
            parse_grid("0 x"),
            Err(LoadError::UnknownCellCode { .. })
        ));
    }

    #[test]
    fn item_lines_accept_both_quote_styles() {
        let text = "(0, 1), 'a golden key'\n\n(2,3), \"l'épée\"\n((4, 5), 'lamp'),\n";
        let items = parse_items(text, "items.txt").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items.lookup(Position::new(0, 1)), Some("a golden key"));
        assert_eq!(items.lookup(Position::new(2, 3)), Some("l'épée"));
        assert_eq!(items.lookup(Position::new(4, 5)), Some("lamp"));
    }

    #[test]
    fn escapes_are_decoded() {
        let items = parse_items(r"(0, 0), 'it\'s a \\ mark'", "items.txt").unwrap();
        assert_eq!(items.lookup(Position::new(0, 0)), Some(r"it's a \ mark"));
    }

    #[test]
    fn unknown_escapes_keep_their_backslash() {
        let items = parse_items(r"(0, 0), 'a\qb', ", "items.txt").unwrap();
        assert_eq!(items.lookup(Position::new(0, 0)), Some(r"a\qb"));

        let doors = parse_doors(r#"(1, 1), ("tab\there", "C:\dir")"#, "doors.txt").unwrap();
        let challenge = doors.lookup(Position::new(1, 1)).unwrap();
        assert_eq!(challenge.prompt, "tab\there");
        assert_eq!(challenge.answer, r"C:\dir");
    }

    #[test]
    fn door_lines_hold_prompt_and_answer() {
        let doors = parse_doors(
            "(5, 7), (\"How many legs has a spider?\", \"8\")\n",
            "doors.txt",
        )
        .unwrap();
        let challenge = doors.lookup(Position::new(5, 7)).unwrap();
        assert_eq!(challenge.prompt, "How many legs has a spider?");
        assert_eq!(challenge.answer, "8");
        assert!(!doors.is_resolved(Position::new(5, 7)));
    }

    #[test]
    fn malformed_lines_name_the_source_and_line() {
        let err = parse_items("(0, 0), 'ok'\n(1, 1) 'missing comma'\n", "items.txt").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedEntry { ref source_name, line: 2, .. } if source_name == "items.txt"
        ));

        let err = parse_doors("(0, 0), 'not a pair'", "doors.txt").unwrap_err();
        assert!(matches!(err, LoadError::MalformedEntry { line: 1, .. }));

        let err = parse_items("(0, -1), 'x'", "items.txt").unwrap_err();
        assert!(matches!(err, LoadError::MalformedEntry { .. }));

        let err = parse_items("(0, 0), 'unterminated", "items.txt").unwrap_err();
        assert!(err.to_string().contains("unterminated string"));
    }

    #[test]
    fn duplicate_positions_are_rejected() {
        let err = parse_items("(1, 1), 'a'\n(1, 1), 'b'\n", "items.txt").unwrap_err();
        assert_eq!(
            err,
            LoadError::DuplicateEntry {
                source_name: "items.txt".into(),
                position: Position::new(1, 1)
            }
        );
    }
}
