//! Surface-facing types: tools, stroke style, pointer input and events.

use std::fmt;
use std::str::FromStr;

use framekit_core::constants::{DEFAULT_LINE_WIDTH, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use framekit_core::{Color, Point};

use crate::editing::HandleId;
use crate::model::{Shape, ShapeType};

/// The active interaction tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    /// Pans the view while zoomed in.
    #[default]
    Move,
    /// Selects shapes without drawing.
    Select,
    Line,
    Rect,
    Circle,
    Free,
    /// Three clicks: vertex, then the two ray endpoints.
    Angle,
    Blur,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::Move,
        Tool::Select,
        Tool::Line,
        Tool::Rect,
        Tool::Circle,
        Tool::Free,
        Tool::Angle,
        Tool::Blur,
    ];

    /// Shape produced by a press-drag-release with this tool.
    pub fn drag_shape(&self) -> Option<ShapeType> {
        match self {
            Tool::Line => Some(ShapeType::Line),
            Tool::Rect => Some(ShapeType::Rect),
            Tool::Circle => Some(ShapeType::Circle),
            Tool::Free => Some(ShapeType::Free),
            Tool::Blur => Some(ShapeType::Blur),
            Tool::Move | Tool::Select | Tool::Angle => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Move => "move",
            Tool::Select => "select",
            Tool::Line => "line",
            Tool::Rect => "rect",
            Tool::Circle => "circle",
            Tool::Free => "free",
            Tool::Angle => "angle",
            Tool::Blur => "blur",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a tool name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Tool::ALL
            .into_iter()
            .find(|t| t.name() == needle)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Color and width applied to newly drawn shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    /// Builds a style, clamping the width into the default range.
    pub fn new(color: Color, width: f64) -> Self {
        Self::within(color, width, (MIN_LINE_WIDTH, MAX_LINE_WIDTH))
    }

    /// Builds a style, clamping the width into `(min, max)`.
    ///
    /// A non-finite width falls back to the default width, itself clamped.
    pub fn within(color: Color, width: f64, (min, max): (f64, f64)) -> Self {
        let width = if width.is_finite() {
            width
        } else {
            DEFAULT_LINE_WIDTH
        };
        Self {
            color,
            width: width.max(min).min(max),
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(Color::default(), DEFAULT_LINE_WIDTH)
    }
}

/// A pointer sample in canvas-relative screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Movement since the previous sample, when the platform reports it.
    pub movement: Option<(f64, f64)>,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            movement: None,
        }
    }

    pub fn with_movement(mut self, dx: f64, dy: f64) -> Self {
        self.movement = Some((dx, dy));
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Notifications for the embedding shell, drained with
/// `AnnotationSurface::take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The user pressed on this surface.
    Activated,
    /// Playback position report from an active surface.
    TimeUpdate { time: f64, duration: f64 },
    /// A video finished loading its metadata.
    MetadataLoaded { duration: f64 },
    /// The user scrubbed this surface while sync is on.
    Scrub { time: f64 },
}

/// Pointer gesture in progress. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        /// Last pointer position in screen pixels.
        last: Point,
    },
    DraggingHandle {
        shape_index: usize,
        handle: HandleId,
    },
    Drawing {
        shape: Shape,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}
