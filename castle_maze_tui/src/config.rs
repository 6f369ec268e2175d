use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result, anyhow};
use castle_maze_core::{CellType, Messages, Position};
use ratatui::style::Color;
use serde::Deserialize;

/// Contents of the game configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub files: DataFiles,
    pub start: StartPosition,
    #[serde(default)]
    pub colors: ColorNames,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the plan and the two dictionaries.
#[derive(Debug, Clone, Deserialize)]
pub struct DataFiles {
    pub plan: PathBuf,
    pub items: PathBuf,
    pub doors: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StartPosition {
    pub row: usize,
    pub col: usize,
}

impl From<StartPosition> for Position {
    fn from(start: StartPosition) -> Self {
        Position::new(start.row, start.col)
    }
}

/// Colour names as written in the file, parsed with `Color::from_str`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorNames {
    pub corridor: String,
    pub wall: String,
    pub exit: String,
    pub door: String,
    pub item: String,
    pub visited: String,
    pub player: String,
}

impl Default for ColorNames {
    fn default() -> Self {
        ColorNames {
            corridor: "white".into(),
            wall: "darkgray".into(),
            exit: "yellow".into(),
            door: "#ffa500".into(),
            item: "green".into(),
            visited: "#f5deb3".into(),
            player: "red".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: Option<String>,
}

impl GameConfig {
    /// Reads a configuration file. Relative data and log paths are resolved
    /// against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.files.plan);
        resolve(&mut self.files.items);
        resolve(&mut self.files.doors);
        if let Some(file) = self.logging.file.as_mut() {
            resolve(file);
        }
    }
}

/// Colours used to draw the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub corridor: Color,
    pub wall: Color,
    pub exit: Color,
    pub door: Color,
    pub item: Color,
    pub visited: Color,
    pub player: Color,
}

impl Palette {
    pub fn color(&self, cell: CellType) -> Color {
        match cell {
            CellType::Corridor => self.corridor,
            CellType::Wall => self.wall,
            CellType::Exit => self.exit,
            CellType::Door => self.door,
            CellType::Item => self.item,
            CellType::Visited => self.visited,
        }
    }
}

impl TryFrom<&ColorNames> for Palette {
    type Error = anyhow::Error;

    fn try_from(names: &ColorNames) -> Result<Self> {
        let parse = |field: &str, name: &str| {
            Color::from_str(name).map_err(|_| anyhow!("Unknown colour '{name}' for {field}"))
        };
        Ok(Palette {
            corridor: parse("corridor", &names.corridor)?,
            wall: parse("wall", &names.wall)?,
            exit: parse("exit", &names.exit)?,
            door: parse("door", &names.door)?,
            item: parse("item", &names.item)?,
            visited: parse("visited", &names.visited)?,
            player: parse("player", &names.player)?,
        })
    }
}

/// Parses `ROW,COL` from the command line.
pub fn parse_position(text: &str) -> Result<Position, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{text}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row '{}'", row.trim()))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", col.trim()))?;
    Ok(Position::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [files]
        plan = "plan.txt"
        items = "items.txt"
        doors = "doors.txt"

        [start]
        row = 0
        col = 1
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = GameConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(Position::from(config.start), Position::new(0, 1));
        assert_eq!(config.messages, Messages::default());
        assert!(config.logging.file.is_none());
        let palette = Palette::try_from(&config.colors).unwrap();
        assert_eq!(palette.color(CellType::Exit), Color::Yellow);
        assert_eq!(palette.color(CellType::Door), Color::Rgb(0xff, 0xa5, 0x00));
    }

    #[test]
    fn overrides_are_partial() {
        let overrides = r#"
            [messages]
            win = "Victoire !"

            [colors]
            player = "blue"
        "#;
        let text = format!("{MINIMAL}{overrides}");
        let config = GameConfig::from_toml(&text).unwrap();
        assert_eq!(config.messages.win, "Victoire !");
        assert_eq!(config.messages.intro, Messages::default().intro);
        assert_eq!(config.colors.player, "blue");
        assert_eq!(config.colors.wall, "darkgray");
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut config = GameConfig::from_toml(MINIMAL).unwrap();
        config.resolve_paths(Path::new("maps"));
        assert_eq!(config.files.plan, Path::new("maps").join("plan.txt"));
    }

    #[test]
    fn unknown_colours_are_rejected() {
        let names = ColorNames {
            wall: "not-a-colour".into(),
            ..ColorNames::default()
        };
        let err = Palette::try_from(&names).unwrap_err();
        assert!(err.to_string().contains("wall"));
    }

    #[test]
    fn command_line_positions() {
        assert_eq!(parse_position("3,4"), Ok(Position::new(3, 4)));
        assert_eq!(parse_position(" 0 , 12 "), Ok(Position::new(0, 12)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,1").is_err());
    }
}
