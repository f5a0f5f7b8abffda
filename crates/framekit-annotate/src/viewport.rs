//! Viewport and coordinate transformation for the annotation overlay.
//!
//! Converts between screen pixels (pointer events, the backing pixmap) and
//! logical shape space. Zoom scales about the canvas center and pan is a
//! screen-space offset applied after scaling:
//!
//! ```text
//! screen = (logical - center) * zoom + center + pan
//! ```

use std::fmt;

use framekit_core::geometry::{Point, Rect};
use tiny_skia::Transform;

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates a viewport at 1:1 zoom with no pan.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Gets the canvas width.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Gets the canvas height.
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (called whenever the container resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Center of the canvas in screen pixels, which is also the zoom pivot.
    pub fn center(&self) -> Point {
        Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level.
    ///
    /// Non-finite and non-positive values are ignored. Returning to exactly
    /// 1.0 also recenters the view, since panning is only reachable while
    /// zoomed in.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() || zoom <= 0.0 {
            return;
        }
        self.zoom = zoom;
        if zoom == 1.0 {
            self.reset_pan();
        }
    }

    /// True while the view is magnified, i.e. when panning makes sense.
    pub fn is_zoomed_in(&self) -> bool {
        self.zoom > 1.0
    }

    /// Gets the pan offset (X coordinate).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (Y coordinate).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Resets pan to origin (0, 0).
    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Converts screen pixel coordinates to logical shape space.
    ///
    /// Formula:
    /// ```text
    /// logical_x = (screen_x - pan_x - cx) / zoom + cx
    /// logical_y = (screen_y - pan_y - cy) / zoom + cy
    /// ```
    pub fn screen_to_logical(&self, screen_x: f64, screen_y: f64) -> Point {
        let c = self.center();
        Point::new(
            (screen_x - self.pan_x - c.x) / self.zoom + c.x,
            (screen_y - self.pan_y - c.y) / self.zoom + c.y,
        )
    }

    /// Converts logical shape space to screen pixel coordinates.
    pub fn logical_to_screen(&self, point: &Point) -> (f64, f64) {
        let c = self.center();
        (
            (point.x - c.x) * self.zoom + c.x + self.pan_x,
            (point.y - c.y) * self.zoom + c.y + self.pan_y,
        )
    }

    /// The logical-to-screen transform for drawing:
    /// translate(pan), translate(center), scale(zoom), translate(-center).
    pub fn transform(&self) -> Transform {
        let c = self.center();
        Transform::from_translate(self.pan_x as f32, self.pan_y as f32)
            .pre_translate(c.x as f32, c.y as f32)
            .pre_scale(self.zoom as f32, self.zoom as f32)
            .pre_translate(-c.x as f32, -c.y as f32)
    }

    /// Where a video of the given native size is drawn when fitted into the
    /// canvas without cropping (letterboxed or pillarboxed).
    ///
    /// Falls back to the whole canvas while the native size is unknown.
    pub fn letterbox(&self, native_width: u32, native_height: u32) -> Rect {
        let (cw, ch) = (self.canvas_width, self.canvas_height);
        if native_width == 0 || native_height == 0 || cw <= 0.0 || ch <= 0.0 {
            return Rect::new(0.0, 0.0, cw.max(0.0), ch.max(0.0));
        }
        let video_aspect = native_width as f64 / native_height as f64;
        let canvas_aspect = cw / ch;
        if video_aspect > canvas_aspect {
            let h = cw / video_aspect;
            Rect::new(0.0, (ch - h) / 2.0, cw, h)
        } else {
            let w = ch * video_aspect;
            Rect::new((cw - w) / 2.0, 0.0, w, ch)
        }
    }

    /// Resets viewport to default state (1:1 zoom, no pan).
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.reset_pan();
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
