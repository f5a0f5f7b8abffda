//! # FrameKit Core
//!
//! Shared building blocks for the FrameKit crates: logical-space geometry,
//! stroke colors, interaction constants and the error taxonomy.

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;

pub use color::Color;
pub use error::{CaptureError, ColorError, Error, PlaybackError, Result, ShapeError};
pub use geometry::{angle_between, distance, distance_to_segment, point_in_rect, Point, Rect};
