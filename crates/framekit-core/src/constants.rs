//! Interaction and rendering constants.
//!
//! Distances are in screen pixels unless noted; code that works in logical
//! space divides them by the current zoom.

// Hit testing and handles
pub const HIT_RADIUS: f64 = 12.0;
pub const MIN_HANDLE_RADIUS: f64 = 6.0;
/// Freehand strokes expose a single larger move handle.
pub const FREE_HANDLE_SCALE: f64 = 1.5;
/// Rectangles are easier to grab than their outline suggests.
pub const RECT_HIT_PADDING_FACTOR: f64 = 2.0;

// Rendering
pub const LIVE_BLUR_PX: f32 = 12.0;
pub const EXPORT_BLUR_PX: f32 = 15.0;
pub const VERTEX_DOT_RADIUS: f64 = 4.0;
pub const LABEL_FONT_SIZE: f64 = 14.0;
/// Label offset from the angle vertex, in shape units (not zoom-compensated).
pub const LABEL_OFFSET: (f64, f64) = (10.0, 20.0);
pub const BLUR_OUTLINE_ALPHA: f32 = 0.3;
pub const LABEL_ALPHA: f32 = 0.7;
pub const HANDLE_OUTLINE_WIDTH: f64 = 2.0;
pub const HANDLE_FILL_RGBA: (u8, u8, u8, f32) = (99, 102, 241, 0.9);

// Transport
pub const SEEK_STEP_SECS: f64 = 0.05;
pub const SPEED_OPTIONS: [f64; 6] = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0];
pub const DEFAULT_SPEED: f64 = 1.0;

// Zoom
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.2;

// Style
pub const PALETTE: [&str; 7] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#3b82f6", "#a855f7", "#ffffff",
];
pub const DEFAULT_COLOR: &str = "#ef4444";
pub const DEFAULT_LINE_WIDTH: f64 = 3.0;
pub const MIN_LINE_WIDTH: f64 = 1.0;
pub const MAX_LINE_WIDTH: f64 = 10.0;

// Export
pub const JPEG_QUALITY: u8 = 90;
pub const SNAPSHOT_FILE_PREFIX: &str = "framekit";
