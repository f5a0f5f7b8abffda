//! Error handling for FrameKit
//!
//! Annotation work is forgiving by nature: a missing frame or a stray pointer
//! release is not an error, it is simply nothing to do. The types here cover
//! the cases that do deserve a name:
//! - Shape errors (diagnostics for malformed geometry)
//! - Color errors (parsing hex strings from menus and config)
//! - Playback errors (a video refusing to start)
//! - Capture errors (a frame that cannot be read back)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Shape validation error
///
/// Reported by `Shape::validate`. Renderers tolerate every one of these,
/// so they are only ever logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A coordinate is NaN or infinite
    #[error("Non-finite coordinate in {shape} shape")]
    NonFiniteCoordinate {
        /// The shape type name.
        shape: &'static str,
    },

    /// Stroke width is zero, negative or not finite
    #[error("Invalid stroke width {width}")]
    InvalidWidth {
        /// The offending width.
        width: f64,
    },

    /// Freehand stroke without any point
    #[error("Freehand shape has no points")]
    EmptyPath,
}

/// Color parsing error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Input contains characters that are not hex digits
    #[error("Invalid hex color: {input}")]
    InvalidHex {
        /// The rejected input.
        input: String,
    },

    /// Input has the wrong number of digits
    #[error("Hex color {input} has {len} digits, expected 3, 6 or 8")]
    InvalidLength {
        /// The rejected input.
        input: String,
        /// Number of digits found.
        len: usize,
    },
}

/// Playback error
///
/// Raised by a video source when a transport command cannot be honoured.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// No media is attached
    #[error("No video loaded")]
    NoVideo,

    /// The source refused to start, e.g. an autoplay policy rejection
    #[error("Playback rejected: {reason}")]
    Rejected {
        /// The reason given by the source.
        reason: String,
    },
}

/// Frame capture error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Metadata is not available yet, so there is no frame size
    #[error("Video metadata not loaded")]
    NotReady,

    /// The frame cannot be read back (cross-origin media)
    #[error("Frame is not readable: {reason}")]
    Tainted {
        /// Why the read-back was refused.
        reason: String,
    },

    /// The frame buffer does not match the advertised size
    #[error("Frame buffer is {actual} bytes, expected {expected}")]
    BufferSize {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
}

/// Main error type for FrameKit
///
/// Returned by the operations that touch the outside world, such as opening
/// a frame from disk.
#[derive(Error, Debug)]
pub enum Error {
    /// Capture error
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
