//! # FrameKit
//!
//! Frame-accurate video annotation: draw, measure and blur on top of one or
//! two synchronized players.
//!
//! ## Architecture
//!
//! FrameKit is organized as a workspace with multiple crates:
//!
//! 1. **framekit-core** - Geometry, colors, constants and error types
//! 2. **framekit-annotate** - Shapes, editing, rendering and the annotation surface
//! 3. **framekit-settings** - Configuration loading, validation and persistence
//! 4. **framekit-player** - Single and split-screen player shell
//! 5. **framekit** - Session driver binary that integrates all crates
//!
//! ## Features
//!
//! - **Annotation Tools**: line, rectangle, circle, freehand, angle and blur
//! - **Editing**: select and drag handles of any committed shape
//! - **View**: per-pane zoom up to 4x with panning
//! - **Linked Playback**: play, step and scrub both panes together
//! - **Export**: JPEG snapshots at the video's native resolution

pub mod session;
pub mod types;

pub use framekit_annotate::{
    AnnotationSurface, FrameSequence, Shape, ShapeKind, ShapeType, Snapshot, SurfaceCommands,
    SurfaceEvent, Tool, VideoFrame, VideoSource,
};
pub use framekit_core::{Color, Error, Point, Rect, Result};
pub use framekit_player::{Key, Layout, PlayerShell, Side};
pub use framekit_settings::Config;
pub use session::Session;
pub use types::{Command, CommandError, ScriptSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr (stdout carries session output)
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
