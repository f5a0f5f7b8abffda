//! # FrameKit Annotate
//!
//! Draw, edit, measure and blur annotations on top of a video.
//!
//! - [`model`]: the six annotation shapes
//! - [`editing`]: hit testing, handles and handle drags
//! - [`renderer`]: tiny-skia rendering of shapes
//! - [`viewport`]: pan/zoom transform between screen and logical space
//! - [`video`]: the video source contract and an in-memory clip
//! - [`surface`]: the interactive surface tying it together
//! - [`export`]: native-resolution JPEG snapshots

pub mod editing;
pub mod export;
pub mod font_manager;
pub mod model;
pub mod renderer;
pub mod surface;
pub mod video;
pub mod viewport;

pub use editing::{
    find_shape_at_pos, handles_for_shape, hit_test_handle, hit_test_shape,
    update_shape_with_handle, Handle, HandleId,
};
pub use export::{ExportSettings, Snapshot, SnapshotJob};
pub use framekit_core::{Color, Point, Rect};
pub use model::{Shape, ShapeKind, ShapeType};
pub use renderer::{render_shape, Painter, RenderOptions};
pub use surface::{
    AnnotationSurface, Gesture, PointerEvent, StrokeStyle, SurfaceCommands, SurfaceEvent, Tool,
};
pub use video::{FrameSequence, VideoFrame, VideoSource};
pub use viewport::Viewport;
