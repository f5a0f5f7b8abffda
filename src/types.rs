//! Session script commands for the root crate
use std::path::PathBuf;
use std::str::FromStr;

use framekit_annotate::surface::{Tool, UnknownTool};
use framekit_core::{Color, ColorError};
use framekit_player::{Key, UnknownKey};
use thiserror::Error;

/// One line of a session script.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tool(Tool),
    Color(Color),
    Width(f64),
    /// Pointer press at pane coordinates
    Down(f64, f64),
    Move(f64, f64),
    Up,
    Zoom(f64),
    Key(Key),
    Speed(f64),
    /// Advance the clocks by this many seconds
    Tick(f64),
    Clear,
    /// Export the active pane, to the given path or a timestamped file
    Snapshot(Option<PathBuf>),
    Status,
}

/// Outcome of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    /// Lines that failed to parse
    pub skipped: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{command}': '{value}' is not a number")]
    InvalidNumber { command: &'static str, value: String },

    #[error(transparent)]
    Tool(#[from] UnknownTool),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Key(#[from] UnknownKey),
}

fn number(
    command: &'static str,
    value: Option<&str>,
    expected: &'static str,
) -> Result<f64, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument { command, expected })?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber {
            command,
            value: value.to_string(),
        })
}

fn point(command: &'static str, args: &[&str]) -> Result<(f64, f64), CommandError> {
    Ok((
        number(command, args.first().copied(), "x y")?,
        number(command, args.get(1).copied(), "x y")?,
    ))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();
        let first = args.first().copied();

        let missing = |command, expected| CommandError::MissingArgument { command, expected };

        Ok(match name.as_str() {
            "tool" => Command::Tool(first.ok_or(missing("tool", "a tool name"))?.parse()?),
            "color" => {
                let hex = first.ok_or(missing("color", "a hex color"))?;
                Command::Color(Color::from_hex(hex)?)
            }
            "width" => Command::Width(number("width", first, "a width")?),
            "down" => {
                let (x, y) = point("down", &args)?;
                Command::Down(x, y)
            }
            "move" => {
                let (x, y) = point("move", &args)?;
                Command::Move(x, y)
            }
            "up" => Command::Up,
            "zoom" => Command::Zoom(number("zoom", first, "a zoom delta")?),
            "key" => {
                let key = first.ok_or(missing("key", "left, right or space"))?;
                Command::Key(key.parse()?)
            }
            "speed" => Command::Speed(number("speed", first, "a rate")?),
            "tick" => Command::Tick(number("tick", first, "seconds")?),
            "clear" => Command::Clear,
            "snapshot" => Command::Snapshot(first.map(PathBuf::from)),
            "status" => Command::Status,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        })
    }
}
