//! Player shell types.

use std::fmt;
use std::str::FromStr;

/// One of the two player panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn other(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pane arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Only the left pane is shown.
    #[default]
    Single,
    /// Both panes side by side.
    Split,
}

impl Layout {
    pub fn is_visible(&self, side: Side) -> bool {
        matches!((self, side), (Layout::Split, _) | (Layout::Single, Side::Left))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Single => write!(f, "single"),
            Layout::Split => write!(f, "split"),
        }
    }
}

/// Keyboard shortcuts understood by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Step back one seek step
    ArrowLeft,
    /// Step forward one seek step
    ArrowRight,
    /// Toggle playback
    Space,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Ok(Key::ArrowLeft),
            "right" | "arrowright" => Ok(Key::ArrowRight),
            "space" | "spacebar" => Ok(Key::Space),
            _ => Err(UnknownKey(s.to_string())),
        }
    }
}
