//! Shape renderer.
//! Draws annotation shapes into a tiny-skia pixmap. The same code paints the
//! live overlay (screen space, viewport transform) and the snapshot export
//! (native video resolution, scale transform).
//!
//! Features:
//! - Anti-aliased strokes with round caps and joins
//! - Zoom-compensated stroke widths
//! - Ellipse-clipped blur of the underlying video frame
//! - Angle labels rasterized from system font glyphs

use framekit_core::constants::{
    BLUR_OUTLINE_ALPHA, HANDLE_FILL_RGBA, HANDLE_OUTLINE_WIDTH, LABEL_ALPHA, LABEL_FONT_SIZE,
    LABEL_OFFSET, LIVE_BLUR_PX, VERTEX_DOT_RADIUS,
};
use framekit_core::geometry::{angle_between, Point, Rect};
use image::RgbaImage;
use rusttype::{point as rt_point, Scale};
use tiny_skia::{
    FillRule, IntSize, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, PixmapMut,
    PixmapPaint, Stroke, Transform,
};
use tracing::debug;

use crate::editing::Handle;
use crate::font_manager;
use crate::model::{Shape, ShapeKind};
use crate::video::VideoFrame;

fn to_skia(c: framekit_core::Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}
fn blur_outline_color() -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(1.0, 1.0, 1.0, BLUR_OUTLINE_ALPHA)
        .unwrap_or(tiny_skia::Color::WHITE)
}
fn label_color() -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(0.0, 0.0, 0.0, LABEL_ALPHA).unwrap_or(tiny_skia::Color::BLACK)
}
fn handle_fill_color() -> tiny_skia::Color {
    let (r, g, b, a) = HANDLE_FILL_RGBA;
    let mut c = tiny_skia::Color::from_rgba8(r, g, b, 255);
    c.set_alpha(a);
    c
}

/// Per-call rendering parameters.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Zoom used to compensate stroke widths and label sizes.
    pub zoom_level: f64,
    /// Frame shown through blur regions.
    pub video: Option<&'a VideoFrame>,
    /// Where `video` is drawn, in the same space as the shapes.
    pub video_rect: Option<Rect>,
    /// Gaussian standard deviation of blur regions, in device pixels.
    pub blur_px: f32,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            video: None,
            video_rect: None,
            blur_px: LIVE_BLUR_PX,
        }
    }
}

/// A drawing target with a transform stack.
///
/// Shapes are described in logical space; the current transform maps them to
/// device pixels. `save` and `restore` bracket temporary transform changes.
pub struct Painter<'a> {
    target: PixmapMut<'a>,
    transform: Transform,
    saved: Vec<Transform>,
}

impl<'a> Painter<'a> {
    pub fn new(target: PixmapMut<'a>) -> Self {
        Self {
            target,
            transform: Transform::identity(),
            saved: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Pops the last saved transform. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.pre_translate(dx as f32, dy as f32);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.pre_scale(sx as f32, sy as f32);
    }

    pub fn clear(&mut self) {
        self.target.fill(tiny_skia::Color::TRANSPARENT);
    }

    pub fn stroke(&mut self, path: &Path, color: tiny_skia::Color, width: f64) {
        if !(width.is_finite() && width > 0.0) {
            return;
        }
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        self.target
            .stroke_path(path, &paint, &stroke, self.transform, None);
    }

    pub fn fill(&mut self, path: &Path, color: tiny_skia::Color) {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.target
            .fill_path(path, &paint, FillRule::Winding, self.transform, None);
    }

    /// Draws a whole frame stretched over `dest` (in current-transform space).
    pub fn draw_frame(&mut self, frame: &VideoFrame, dest: Rect) {
        if frame.width() == 0 || frame.height() == 0 || dest.is_empty() {
            return;
        }
        let t = frame_transform(self.transform, frame, dest);
        let paint = PixmapPaint {
            quality: tiny_skia::FilterQuality::Bilinear,
            ..Default::default()
        };
        self.target
            .draw_pixmap(0, 0, frame.pixmap().as_ref(), &paint, t, None);
    }

    /// Paints a blurred copy of `frame` (drawn at `dest`) inside `clip`.
    ///
    /// Only the device-space neighbourhood of the clip is blurred; the margin
    /// of three standard deviations keeps the kernel from sampling the
    /// artificial edge of the working buffer.
    pub fn draw_blurred_frame(&mut self, frame: &VideoFrame, dest: Rect, clip: &Path, sigma: f32) {
        let Some(device_clip) = clip.clone().transform(self.transform) else {
            return;
        };
        let b = device_clip.bounds();
        let margin = (sigma.max(0.0) * 3.0).ceil();
        let x0 = (b.left() - margin).floor().max(0.0) as i32;
        let y0 = (b.top() - margin).floor().max(0.0) as i32;
        let x1 = ((b.right() + margin).ceil() as i32).min(self.width() as i32);
        let y1 = ((b.bottom() + margin).ceil() as i32).min(self.height() as i32);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);

        let Some(mut work) = Pixmap::new(w, h) else {
            return;
        };
        let paint = PixmapPaint {
            quality: tiny_skia::FilterQuality::Bilinear,
            ..Default::default()
        };
        let shifted = Transform::from_translate(-x0 as f32, -y0 as f32).pre_concat(self.transform);
        work.draw_pixmap(
            0,
            0,
            frame.pixmap().as_ref(),
            &paint,
            frame_transform(shifted, frame, dest),
            None,
        );

        let Some(blurred) = blur_premultiplied(&work, sigma) else {
            return;
        };

        let Some(mut mask) = Mask::new(self.width(), self.height()) else {
            return;
        };
        mask.fill_path(clip, FillRule::Winding, true, self.transform);
        self.target.draw_pixmap(
            x0,
            y0,
            blurred.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            Some(&mask),
        );
    }

    /// Fills `text` with its baseline starting at `origin` (current-transform
    /// space). The glyphs are rasterized at device resolution, so the label
    /// stays crisp under any zoom. Returns `false` when no font is available.
    pub fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f64,
        color: tiny_skia::Color,
    ) -> bool {
        let Some(font) = font_manager::label_font() else {
            debug!("No label font available, skipping text");
            return false;
        };

        let t = self.transform;
        let mut device = tiny_skia::Point::from_xy(origin.x as f32, origin.y as f32);
        t.map_points(std::slice::from_mut(&mut device));
        let scale = Scale {
            x: (size as f32 * t.sx.abs()).max(0.0),
            y: (size as f32 * t.sy.abs()).max(0.0),
        };
        if scale.x <= 0.0 || scale.y <= 0.0 {
            return true;
        }

        let (w, h) = (self.width(), self.height());
        let Some(mut mask) = Mask::new(w, h) else {
            return true;
        };
        let stride = w as usize;
        let coverage = mask.data_mut();
        let mut touched = false;
        for glyph in font.layout(text, scale, rt_point(device.x, device.y)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px >= w as i32 || py >= h as i32 {
                    return;
                }
                let idx = py as usize * stride + px as usize;
                let a = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                coverage[idx] = coverage[idx].max(a);
                touched = true;
            });
        }
        if !touched {
            return true;
        }

        let mut paint = Paint::default();
        paint.set_color(color);
        if let Some(full) = tiny_skia::Rect::from_xywh(0.0, 0.0, w as f32, h as f32) {
            self.target
                .fill_rect(full, &paint, Transform::identity(), Some(&mask));
        }
        true
    }
}

/// Maps the frame's pixel grid onto `dest` under `base`.
fn frame_transform(base: Transform, frame: &VideoFrame, dest: Rect) -> Transform {
    base.pre_translate(dest.x as f32, dest.y as f32).pre_scale(
        (dest.width / frame.width() as f64) as f32,
        (dest.height / frame.height() as f64) as f32,
    )
}

/// Gaussian blur over premultiplied pixels.
fn blur_premultiplied(src: &Pixmap, sigma: f32) -> Option<Pixmap> {
    let (w, h) = (src.width(), src.height());
    if sigma <= 0.0 {
        return Some(src.clone());
    }
    let buffer = RgbaImage::from_raw(w, h, src.data().to_vec())?;
    let mut data = image::imageops::fast_blur(&buffer, sigma).into_raw();
    // Rounding can push a channel just past its alpha
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(w, h)?)
}

fn segment_path(points: &[(Point, Point)]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for (a, b) in points {
        pb.move_to(a.x as f32, a.y as f32);
        pb.line_to(b.x as f32, b.y as f32);
    }
    pb.finish()
}

fn box_path(start: Point, end: Point) -> Option<Path> {
    let r = Rect::from_corners(start, end);
    let (l, t, rt, b) = (
        r.min_x() as f32,
        r.min_y() as f32,
        r.max_x() as f32,
        r.max_y() as f32,
    );
    let mut pb = PathBuilder::new();
    pb.move_to(l, t);
    pb.line_to(rt, t);
    pb.line_to(rt, b);
    pb.line_to(l, b);
    pb.close();
    pb.finish()
}

fn ellipse_path(start: Point, end: Point) -> Option<Path> {
    let r = Rect::from_corners(start, end);
    let oval =
        tiny_skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32)?;
    PathBuilder::from_oval(oval)
}

fn circle_path(center: Point, radius: f64) -> Option<Path> {
    if !(radius.is_finite() && radius > 0.0) {
        return None;
    }
    PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
}

/// Filled vertex marker used by angle shapes and pending angle points.
pub fn render_vertex_dot(
    painter: &mut Painter<'_>,
    at: Point,
    color: framekit_core::Color,
    zoom: f64,
) {
    if let Some(dot) = circle_path(at, VERTEX_DOT_RADIUS / zoom) {
        painter.fill(&dot, to_skia(color));
    }
}

/// Draws one shape. The shape is never modified, and malformed geometry
/// (zero radius, single-point strokes, non-finite values) draws nothing.
pub fn render_shape(painter: &mut Painter<'_>, shape: &Shape, options: &RenderOptions<'_>) {
    let zoom = options.zoom_level;
    let width = shape.width / zoom;
    let color = to_skia(shape.color);

    painter.save();
    match &shape.kind {
        ShapeKind::Line { start, end } => {
            if let Some(path) = segment_path(&[(*start, *end)]) {
                painter.stroke(&path, color, width);
            }
        }
        ShapeKind::Rect { start, end } => {
            if let Some(path) = box_path(*start, *end) {
                painter.stroke(&path, color, width);
            }
        }
        ShapeKind::Circle { start, end } => {
            if let Some(path) = circle_path(*start, start.distance_to(end)) {
                painter.stroke(&path, color, width);
            }
        }
        ShapeKind::Blur { start, end } => {
            if let Some(ellipse) = ellipse_path(*start, *end) {
                if let (Some(frame), Some(dest)) = (options.video, options.video_rect) {
                    painter.draw_blurred_frame(frame, dest, &ellipse, options.blur_px);
                }
                painter.stroke(&ellipse, blur_outline_color(), 1.0 / zoom);
            }
        }
        ShapeKind::Free { points } => {
            if points.len() >= 2 {
                let mut pb = PathBuilder::new();
                pb.move_to(points[0].x as f32, points[0].y as f32);
                for p in &points[1..] {
                    pb.line_to(p.x as f32, p.y as f32);
                }
                if let Some(path) = pb.finish() {
                    painter.stroke(&path, color, width);
                }
            }
        }
        ShapeKind::Angle { p1, p2, p3 } => {
            render_vertex_dot(painter, *p1, shape.color, zoom);
            let rays: Vec<(Point, Point)> = [p2, p3]
                .into_iter()
                .flatten()
                .map(|p| (*p1, *p))
                .collect();
            if let Some(path) = segment_path(&rays) {
                painter.stroke(&path, color, width);
            }
            if let (Some(a), Some(b)) = (p2, p3) {
                let label = format!("{}°", angle_between(*p1, *a, *b));
                let origin = p1.offset(LABEL_OFFSET.0, LABEL_OFFSET.1);
                painter.fill_text(&label, origin, LABEL_FONT_SIZE / zoom, label_color());
            }
        }
    }
    painter.restore();
}

/// Draws selection handles: indigo discs with a white rim.
pub fn render_handles(painter: &mut Painter<'_>, handles: &[Handle], zoom: f64) {
    for h in handles {
        if let Some(disc) = circle_path(h.position, h.radius) {
            painter.fill(&disc, handle_fill_color());
            painter.stroke(&disc, tiny_skia::Color::WHITE, HANDLE_OUTLINE_WIDTH / zoom);
        }
    }
}
