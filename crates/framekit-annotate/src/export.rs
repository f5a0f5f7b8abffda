//! Snapshot export at native video resolution.
//!
//! A [`SnapshotJob`] owns copies of everything it reads (the frame behind an
//! `Arc`, a clone of the shape list) so it can render on a worker thread
//! while the surface keeps changing. The result carries the surface
//! generation it was started at; callers check it with
//! `AnnotationSurface::accepts` before using it.
//!
//! Shapes live in the container's logical space, so the job draws the frame
//! at native size and replays every shape through a scale of
//! `native / container` per axis.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use framekit_core::constants::{EXPORT_BLUR_PX, JPEG_QUALITY};
use framekit_core::geometry::{Point, Rect};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tiny_skia::Pixmap;
use tracing::{debug, warn};

use crate::model::Shape;
use crate::renderer::{render_shape, Painter, RenderOptions};
use crate::video::{pixmap_to_rgba, VideoFrame};

/// Export parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Blur radius of blur regions, in native pixels.
    pub blur_px: f32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            blur_px: EXPORT_BLUR_PX,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// An encoded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Surface generation the snapshot was taken at.
    pub generation: u64,
    pub width: u32,
    pub height: u32,
    /// JPEG bytes.
    pub jpeg: Vec<u8>,
}

impl Snapshot {
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.jpeg)
    }
}

/// Self-contained snapshot request.
#[derive(Debug, Clone)]
pub struct SnapshotJob {
    generation: u64,
    frame: Arc<VideoFrame>,
    shapes: Vec<Shape>,
    container: (f64, f64),
    settings: ExportSettings,
}

impl SnapshotJob {
    pub fn new(
        generation: u64,
        frame: Arc<VideoFrame>,
        shapes: Vec<Shape>,
        container: (f64, f64),
        settings: ExportSettings,
    ) -> Self {
        Self {
            generation,
            frame,
            shapes,
            container,
            settings,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Output size, i.e. the native frame size.
    pub fn native_size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    /// Per-axis factor from container logical space to native pixels.
    pub fn scale(&self) -> (f64, f64) {
        let (w, h) = self.native_size();
        (w as f64 / self.container.0, h as f64 / self.container.1)
    }

    /// Where a logical-space point lands in the exported image.
    pub fn map_to_native(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(p.x * sx, p.y * sy)
    }

    /// Renders the annotated frame without encoding it.
    pub fn render_pixmap(&self) -> Option<Pixmap> {
        let (w, h) = self.native_size();
        let (sx, sy) = self.scale();
        if !(sx.is_finite() && sy.is_finite()) {
            return None;
        }
        let mut pixmap = Pixmap::new(w, h)?;
        {
            let mut painter = Painter::new(pixmap.as_mut());
            painter.draw_frame(&self.frame, Rect::new(0.0, 0.0, w as f64, h as f64));
            painter.scale(sx, sy);

            let options = RenderOptions {
                zoom_level: 1.0,
                video: Some(self.frame.as_ref()),
                video_rect: Some(Rect::new(0.0, 0.0, self.container.0, self.container.1)),
                blur_px: self.settings.blur_px,
            };
            for shape in &self.shapes {
                render_shape(&mut painter, shape, &options);
            }
        }
        Some(pixmap)
    }

    /// Renders and JPEG-encodes the snapshot.
    pub fn render(&self) -> Option<Snapshot> {
        let pixmap = self.render_pixmap()?;
        let rgb = DynamicImage::ImageRgba8(pixmap_to_rgba(&pixmap)).to_rgb8();

        let mut jpeg = Vec::new();
        let quality = self.settings.jpeg_quality.clamp(1, 100);
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), quality);
        if let Err(e) = rgb.write_with_encoder(encoder) {
            warn!("Snapshot encoding failed: {}", e);
            return None;
        }

        debug!(
            width = pixmap.width(),
            height = pixmap.height(),
            bytes = jpeg.len(),
            shapes = self.shapes.len(),
            "Snapshot rendered"
        );
        Some(Snapshot {
            generation: self.generation,
            width: pixmap.width(),
            height: pixmap.height(),
            jpeg,
        })
    }
}
