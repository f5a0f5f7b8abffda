//! Annotation surface.
//!
//! Owns everything one annotated video player needs: the committed shapes,
//! the gesture in progress, selection, pan/zoom and the transparent overlay
//! pixmap the shapes are painted into.
//!
//! Pointer input drives a small state machine:
//!
//! ```text
//! Idle --down--> Panning | DraggingHandle | Drawing | Idle (select / angle click)
//! Panning        --move--> pan_by(delta)        --up/leave/cancel--> Idle
//! DraggingHandle --move--> update handle        --up/leave/cancel--> Idle
//! Drawing        --move--> extend shape         --up/leave/cancel--> commit, Idle
//! ```
//!
//! The embedding shell talks to the surface through [`SurfaceCommands`] and
//! receives [`SurfaceEvent`]s by draining [`AnnotationSurface::take_events`].

mod commands;
mod types;

pub use commands::SurfaceCommands;
pub use types::{Gesture, PointerEvent, StrokeStyle, SurfaceEvent, Tool, UnknownTool};

use std::sync::Arc;

use framekit_core::constants::{LIVE_BLUR_PX, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use framekit_core::{Color, Point};
use tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::editing::{find_shape_at_pos, handles_for_shape, hit_test_handle, update_shape_with_handle};
use crate::export::{ExportSettings, Snapshot, SnapshotJob};
use crate::model::{Shape, ShapeType};
use crate::renderer::{render_handles, render_shape, render_vertex_dot, Painter, RenderOptions};
use crate::video::{VideoFrame, VideoSource};
use crate::viewport::Viewport;

/// Interactive annotation layer over one video.
pub struct AnnotationSurface {
    video: Option<Box<dyn VideoSource>>,
    shapes: Vec<Shape>,
    angle_points: Vec<Point>,
    selected: Option<usize>,
    gesture: Gesture,
    viewport: Viewport,
    tool: Tool,
    style: StrokeStyle,
    width_range: (f64, f64),
    active: bool,
    synced: bool,
    overlay: Option<Pixmap>,
    events: Vec<SurfaceEvent>,
    last_reported_time: Option<f64>,
    generation: u64,
    live_blur_px: f32,
    export: ExportSettings,
}

impl Default for AnnotationSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSurface {
    pub fn new() -> Self {
        Self {
            video: None,
            shapes: Vec::new(),
            angle_points: Vec::new(),
            selected: None,
            gesture: Gesture::Idle,
            viewport: Viewport::default(),
            tool: Tool::default(),
            style: StrokeStyle::default(),
            width_range: (MIN_LINE_WIDTH, MAX_LINE_WIDTH),
            active: false,
            synced: false,
            overlay: None,
            events: Vec::new(),
            last_reported_time: None,
            generation: 0,
            live_blur_px: LIVE_BLUR_PX,
            export: ExportSettings::default(),
        }
    }

    /// Overrides the blur radius used by the live overlay.
    pub fn set_live_blur(&mut self, blur_px: f32) {
        if blur_px.is_finite() && blur_px >= 0.0 {
            self.live_blur_px = blur_px;
        }
    }

    pub fn set_export_settings(&mut self, export: ExportSettings) {
        self.export = export;
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.export
    }

    // ---------------------------------------------------------------------
    // Video lifecycle
    // ---------------------------------------------------------------------

    /// Attaches a video, discarding all annotation state of the previous one.
    pub fn load_video(&mut self, video: Box<dyn VideoSource>) {
        let duration = video.duration();
        let (w, h) = video.native_size();
        self.video = Some(video);
        self.reset_annotations();
        self.generation += 1;
        info!(width = w, height = h, duration, "Video loaded");
        if w > 0 && h > 0 {
            self.events.push(SurfaceEvent::MetadataLoaded { duration });
        }
    }

    /// Detaches the video and discards all annotation state.
    pub fn clear_video(&mut self) {
        if self.video.take().is_some() {
            info!("Video cleared");
        }
        self.reset_annotations();
        self.generation += 1;
    }

    fn reset_annotations(&mut self) {
        self.shapes.clear();
        self.angle_points.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.viewport.reset();
        self.last_reported_time = None;
    }

    pub fn video(&self) -> Option<&dyn VideoSource> {
        self.video.as_deref()
    }

    pub fn video_mut(&mut self) -> Option<&mut (dyn VideoSource + 'static)> {
        self.video.as_deref_mut()
    }

    /// Advances the video clock by `dt` seconds of wall time.
    pub fn advance(&mut self, dt: f64) {
        if let Some(v) = self.video.as_mut() {
            v.advance(dt);
        }
    }

    /// Changes with every video load or clear. Snapshots carry the value
    /// they were taken at, see [`AnnotationSurface::accepts`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ---------------------------------------------------------------------
    // Inbound configuration
    // ---------------------------------------------------------------------

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches tools. A gesture already in progress keeps running and a
    /// half-built angle keeps its points.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            debug!(from = %self.tool, to = %tool, "Tool changed");
            self.tool = tool;
        }
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Sets the color and width of new shapes; the width is clamped to
    /// [`Self::set_width_range`].
    pub fn set_style(&mut self, color: Color, width: f64) {
        self.style = StrokeStyle::within(color, width, self.width_range);
    }

    /// Allowed stroke widths. An inverted or non-finite range is ignored.
    pub fn set_width_range(&mut self, min: f64, max: f64) {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            warn!(min, max, "Ignoring invalid width range");
            return;
        }
        self.width_range = (min, max);
        self.style = StrokeStyle::within(self.style.color, self.style.width, self.width_range);
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Sets the container size in screen pixels without painting.
    pub fn set_container_size(&mut self, width: u32, height: u32) {
        self.viewport.set_canvas_size(width as f64, height as f64);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    // ---------------------------------------------------------------------
    // State queries
    // ---------------------------------------------------------------------

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.and_then(|i| self.shapes.get(i))
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Angle points clicked so far (0 to 2).
    pub fn pending_angle_points(&self) -> &[Point] {
        &self.angle_points
    }

    /// The shape being drawn, if any.
    pub fn in_progress(&self) -> Option<&Shape> {
        match &self.gesture {
            Gesture::Drawing { shape } => Some(shape),
            _ => None,
        }
    }

    /// Drains queued events.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Pointer input
    // ---------------------------------------------------------------------

    pub fn pointer_down(&mut self, ev: PointerEvent) {
        self.events.push(SurfaceEvent::Activated);
        if self.video.is_none() {
            return;
        }
        if !self.gesture.is_idle() {
            debug!(gesture = ?self.gesture, "Pointer down during a gesture ignored");
            return;
        }

        if self.tool == Tool::Move {
            if self.viewport.is_zoomed_in() {
                self.gesture = Gesture::Panning {
                    last: ev.position(),
                };
            }
            return;
        }

        let zoom = self.viewport.zoom();
        let pos = self.viewport.screen_to_logical(ev.x, ev.y);

        if let Some(index) = self.selected {
            let handle = self
                .shapes
                .get(index)
                .and_then(|shape| hit_test_handle(pos, shape, zoom));
            if let Some(handle) = handle {
                self.gesture = Gesture::DraggingHandle {
                    shape_index: index,
                    handle,
                };
                self.pause_video();
                return;
            }
        }

        if let Some(index) = find_shape_at_pos(pos, &self.shapes, zoom) {
            self.selected = Some(index);
            return;
        }
        self.selected = None;

        if self.tool == Tool::Select {
            return;
        }

        self.pause_video();

        if self.tool == Tool::Angle {
            self.angle_points.push(pos);
            if let [p1, p2, p3] = self.angle_points[..] {
                let shape = Shape::angle(p1, p2, p3, self.style.color, self.style.width);
                self.commit(shape);
                self.angle_points.clear();
            }
            return;
        }

        if let Some(shape_type) = self.tool.drag_shape() {
            self.gesture = Gesture::Drawing {
                shape: Shape::begin(shape_type, pos, self.style.color, self.style.width),
            };
        }
    }

    pub fn pointer_move(&mut self, ev: PointerEvent) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let (dx, dy) = ev
                    .movement
                    .unwrap_or((ev.x - last.x, ev.y - last.y));
                *last = ev.position();
                self.viewport.pan_by(dx, dy);
            }
            Gesture::DraggingHandle {
                shape_index,
                handle,
            } => {
                let (index, handle) = (*shape_index, *handle);
                let pos = self.viewport.screen_to_logical(ev.x, ev.y);
                match self.shapes.get(index) {
                    Some(shape) => {
                        let updated = update_shape_with_handle(shape, handle, pos);
                        self.shapes[index] = updated;
                    }
                    None => debug!(index, "Drag target no longer exists"),
                }
            }
            Gesture::Drawing { shape } => {
                let pos = self.viewport.screen_to_logical(ev.x, ev.y);
                shape.extend_to(pos);
            }
        }
    }

    pub fn pointer_up(&mut self, _ev: PointerEvent) {
        self.end_gesture();
    }

    /// The pointer left the canvas; ends the gesture like a release.
    pub fn pointer_leave(&mut self) {
        self.end_gesture();
    }

    /// The platform cancelled the pointer; ends the gesture like a release.
    pub fn pointer_cancel(&mut self) {
        self.end_gesture();
    }

    fn end_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning { .. } | Gesture::DraggingHandle { .. } => {}
            Gesture::Drawing { shape } => self.commit(shape),
        }
    }

    /// Appends a shape and selects it, in one step.
    fn commit(&mut self, shape: Shape) {
        if let Err(e) = shape.validate() {
            warn!("Committing malformed {} shape: {}", shape.shape_type(), e);
        }
        debug!(kind = %shape.shape_type(), index = self.shapes.len(), "Shape committed");
        self.shapes.push(shape);
        self.selected = Some(self.shapes.len() - 1);
    }

    fn pause_video(&mut self) {
        if let Some(v) = self.video.as_mut() {
            v.pause();
        }
    }

    /// Seeks from a user scrub on this surface; reported to the shell when
    /// sync is on so the other player can follow.
    pub fn scrub_to(&mut self, time: f64) {
        let Some(v) = self.video.as_mut() else {
            return;
        };
        v.set_current_time(time);
        if self.synced {
            self.events.push(SurfaceEvent::Scrub {
                time: v.current_time(),
            });
        }
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    fn current_frame(&self) -> Option<Arc<VideoFrame>> {
        let video = self.video.as_ref()?;
        if !self.shapes.iter().chain(self.in_progress()).any(|s| s.shape_type() == ShapeType::Blur) {
            return None;
        }
        match video.capture_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                debug!("Live blur without frame: {}", e);
                None
            }
        }
    }

    /// Paints the overlay for one animation tick and returns it.
    ///
    /// The overlay is transparent except for the annotations, matching the
    /// container size in screen pixels. Returns `None` for a zero-sized
    /// container.
    pub fn paint(&mut self, width: u32, height: u32) -> Option<&Pixmap> {
        self.viewport.set_canvas_size(width as f64, height as f64);
        let resized = self
            .overlay
            .as_ref()
            .map_or(true, |p| p.width() != width || p.height() != height);
        if resized {
            self.overlay = Pixmap::new(width, height);
        }

        let frame = self.current_frame();
        let video_rect = self.video.as_ref().map(|v| {
            let (w, h) = v.native_size();
            self.viewport.letterbox(w, h)
        });
        let zoom = self.viewport.zoom();
        let options = RenderOptions {
            zoom_level: zoom,
            video: frame.as_deref(),
            video_rect,
            blur_px: self.live_blur_px,
        };

        let overlay = self.overlay.as_mut()?;
        let mut painter = Painter::new(overlay.as_mut());
        painter.clear();
        painter.set_transform(self.viewport.transform());

        for shape in &self.shapes {
            render_shape(&mut painter, shape, &options);
        }
        if let Gesture::Drawing { shape } = &self.gesture {
            render_shape(&mut painter, shape, &options);
        }
        if self.tool == Tool::Angle {
            for p in &self.angle_points {
                render_vertex_dot(&mut painter, *p, self.style.color, zoom);
            }
        }
        if let Some(shape) = self.selected.and_then(|i| self.shapes.get(i)) {
            render_handles(&mut painter, &handles_for_shape(shape, zoom), zoom);
        }

        self.report_time();
        self.overlay.as_ref()
    }

    /// The full view a user would see: the letterboxed frame under the same
    /// pan and zoom, with the overlay on top.
    pub fn render_view(&mut self, width: u32, height: u32) -> Option<Pixmap> {
        let mut view = Pixmap::new(width, height)?;
        view.fill(tiny_skia::Color::BLACK);
        if let Some(video) = self.video.as_ref() {
            match video.capture_frame() {
                Ok(frame) => {
                    self.viewport.set_canvas_size(width as f64, height as f64);
                    let dest = self.viewport.letterbox(frame.width(), frame.height());
                    let mut painter = Painter::new(view.as_mut());
                    painter.set_transform(self.viewport.transform());
                    painter.draw_frame(&frame, dest);
                }
                Err(e) => debug!("View without frame: {}", e),
            }
        }
        let overlay = self.paint(width, height)?;
        view.draw_pixmap(
            0,
            0,
            overlay.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            tiny_skia::Transform::identity(),
            None,
        );
        Some(view)
    }

    fn report_time(&mut self) {
        if !self.active {
            return;
        }
        let Some(video) = self.video.as_ref() else {
            return;
        };
        let time = video.current_time();
        if self.last_reported_time == Some(time) {
            return;
        }
        self.last_reported_time = Some(time);
        self.events.push(SurfaceEvent::TimeUpdate {
            time,
            duration: video.duration(),
        });
    }

    // ---------------------------------------------------------------------
    // Snapshot export
    // ---------------------------------------------------------------------

    /// Captures everything a snapshot needs so it can render off the surface.
    ///
    /// Returns `None` without a video, before metadata, for a zero-sized
    /// container or when the frame cannot be read back.
    pub fn begin_snapshot(&self) -> Option<SnapshotJob> {
        let Some(video) = self.video.as_ref() else {
            debug!("Snapshot requested without a video");
            return None;
        };
        let native = video.native_size();
        if native.0 == 0 || native.1 == 0 {
            debug!("Snapshot requested before metadata");
            return None;
        }
        let container = (self.viewport.canvas_width(), self.viewport.canvas_height());
        if container.0 <= 0.0 || container.1 <= 0.0 {
            debug!("Snapshot requested before the surface was laid out");
            return None;
        }
        let frame = match video.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Snapshot frame capture failed: {}", e);
                return None;
            }
        };
        Some(SnapshotJob::new(
            self.generation,
            frame,
            self.shapes.clone(),
            container,
            self.export.clone(),
        ))
    }

    /// Whether a finished snapshot still belongs to the current video.
    pub fn accepts(&self, snapshot: &Snapshot) -> bool {
        self.video.is_some() && snapshot.generation == self.generation
    }
}
