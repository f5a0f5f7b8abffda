//! Player shell.
//!
//! Hosts two [`AnnotationSurface`]s and the controls shared between them:
//! transport, speed, zoom, drawing style, the global scrubber and snapshot
//! export. Transport commands go to both panes when they are linked and to
//! the active pane otherwise.
//!
//! The shell never reaches into a surface's annotations; it drives surfaces
//! through [`SurfaceCommands`] and reacts to the [`SurfaceEvent`]s they queue.

use std::fmt;

use chrono::Utc;
use framekit_annotate::export::{ExportSettings, Snapshot};
use framekit_annotate::surface::{
    AnnotationSurface, PointerEvent, SurfaceCommands, SurfaceEvent, Tool,
};
use framekit_annotate::video::VideoSource;
use framekit_core::Color;
use framekit_settings::Config;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::types::{Key, Layout, Side};

/// Zoom values are rounded to this many steps per unit so repeated
/// in/out presses land back on exactly 1.0.
const ZOOM_QUANTUM: f64 = 1e6;

/// A snapshot being encoded on a blocking task.
pub struct PendingSnapshot {
    side: Side,
    task: JoinHandle<Option<Snapshot>>,
}

impl PendingSnapshot {
    /// Pane the snapshot was taken from.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Waits for the encoder. A panicked or cancelled task yields `None`.
    pub async fn wait(self) -> Option<Snapshot> {
        match self.task.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Snapshot task failed: {}", e);
                None
            }
        }
    }
}

/// Single or split-screen player with shared controls.
pub struct PlayerShell {
    config: Config,
    left: AnnotationSurface,
    right: AnnotationSurface,
    layout: Layout,
    active: Side,
    sync: bool,
    playing: bool,
    speed: f64,
    tool: Tool,
    color: Color,
    line_width: f64,
    global_time: f64,
    global_duration: f64,
}

impl Default for PlayerShell {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl PlayerShell {
    /// Builds a shell from `config`. An invalid configuration is logged and
    /// replaced by the defaults.
    pub fn new(config: Config) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Invalid configuration, using defaults: {}", e);
                Config::default()
            }
        };
        let export = ExportSettings {
            blur_px: config.export.export_blur_px,
            jpeg_quality: config.export.jpeg_quality,
        };
        let make_surface = || {
            let mut surface = AnnotationSurface::new();
            surface.set_live_blur(config.export.live_blur_px);
            surface.set_export_settings(export.clone());
            surface.set_width_range(config.style.min_width, config.style.max_width);
            surface.set_style(config.style.default_color, config.style.default_width);
            surface
        };
        let mut left = make_surface();
        let right = make_surface();
        left.set_active(true);

        Self {
            left,
            right,
            layout: Layout::default(),
            active: Side::Left,
            sync: false,
            playing: false,
            speed: config.playback.default_speed,
            tool: Tool::default(),
            color: config.style.default_color,
            line_width: config.style.default_width,
            global_time: 0.0,
            global_duration: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Panes
    // ---------------------------------------------------------------------

    pub fn surface(&self, side: Side) -> &AnnotationSurface {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn surface_mut(&mut self, side: Side) -> &mut AnnotationSurface {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn active_surface(&self) -> &AnnotationSurface {
        self.surface(self.active)
    }

    fn active_surface_mut(&mut self) -> &mut AnnotationSurface {
        self.surface_mut(self.active)
    }

    /// Panes that transport commands apply to.
    fn targets(&self) -> &'static [Side] {
        match (self.sync, self.active) {
            (true, _) => &Side::BOTH,
            (false, Side::Left) => &[Side::Left],
            (false, Side::Right) => &[Side::Right],
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Switches layouts. Going back to a single pane activates the left one.
    pub fn set_layout(&mut self, layout: Layout) {
        if self.layout != layout {
            info!(%layout, "Layout changed");
            self.layout = layout;
        }
        if layout == Layout::Single {
            self.activate(Side::Left);
        }
    }

    /// Makes `side` the pane that receives transport, zoom and export
    /// commands. Hidden panes cannot be activated.
    pub fn activate(&mut self, side: Side) {
        if !self.layout.is_visible(side) {
            debug!(%side, "Ignoring activation of a hidden pane");
            return;
        }
        if self.active != side {
            debug!(%side, "Pane activated");
            self.active = side;
        }
        self.left.set_active(side == Side::Left);
        self.right.set_active(side == Side::Right);
    }

    pub fn is_synced(&self) -> bool {
        self.sync
    }

    /// Links or unlinks the two panes.
    pub fn set_sync(&mut self, sync: bool) {
        self.sync = sync;
        self.left.set_synced(sync);
        self.right.set_synced(sync);
        info!(sync, "Pane link changed");
    }

    pub fn toggle_sync(&mut self) {
        self.set_sync(!self.sync);
    }

    pub fn set_container_size(&mut self, side: Side, width: u32, height: u32) {
        self.surface_mut(side).set_container_size(width, height);
    }

    // ---------------------------------------------------------------------
    // Video
    // ---------------------------------------------------------------------

    /// Attaches a video to one pane at the current playback speed.
    pub fn load_video(&mut self, side: Side, video: Box<dyn VideoSource>) {
        let speed = self.speed;
        let surface = self.surface_mut(side);
        surface.load_video(video);
        surface.set_playback_rate(speed);
        info!(%side, "Video attached");
        self.process_events();
    }

    /// Detaches a pane's video. Clearing the active pane also resets the
    /// global clock and the play state.
    pub fn clear_video(&mut self, side: Side) {
        self.surface_mut(side).clear_video();
        if side == self.active {
            self.global_time = 0.0;
            self.global_duration = 0.0;
            self.playing = false;
        }
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        let playing = self.playing;
        for &side in self.targets() {
            let surface = self.surface_mut(side);
            if playing {
                surface.play();
            } else {
                surface.pause();
            }
        }
        debug!(playing, "Playback toggled");
    }

    /// Seeks by `delta` seconds.
    pub fn seek(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        for &side in self.targets() {
            self.surface_mut(side).seek_relative(delta);
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn speed_options(&self) -> &[f64] {
        &self.config.playback.speed_options
    }

    /// Applies a playback rate to both panes, linked or not.
    pub fn change_speed(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            warn!(rate, "Ignoring invalid playback speed");
            return;
        }
        self.speed = rate;
        self.left.set_playback_rate(rate);
        self.right.set_playback_rate(rate);
        info!(rate, "Playback speed changed");
    }

    pub fn handle_key(&mut self, key: Key) {
        let step = self.config.playback.seek_step;
        match key {
            Key::ArrowLeft => self.seek(-step),
            Key::ArrowRight => self.seek(step),
            Key::Space => self.toggle_play(),
        }
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn global_duration(&self) -> f64 {
        self.global_duration
    }

    /// Moves the footer scrubber.
    pub fn global_scrub(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        self.global_time = time;
        for &side in self.targets() {
            self.surface_mut(side).seek_to(time);
        }
    }

    /// Scrub on one pane's own timeline; followed by the other pane when
    /// linked.
    pub fn scrub(&mut self, side: Side, time: f64) {
        self.surface_mut(side).scrub_to(time);
        self.process_events();
    }

    fn linked_scrub(&mut self, time: f64) {
        if !self.sync {
            return;
        }
        self.left.seek_to(time);
        self.right.seek_to(time);
    }

    // ---------------------------------------------------------------------
    // Zoom and drawing style
    // ---------------------------------------------------------------------

    pub fn zoom(&self, side: Side) -> f64 {
        self.surface(side).zoom()
    }

    /// Changes the active pane's zoom by `delta`, clamped to the configured
    /// range.
    pub fn adjust_zoom(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let target = self.active_surface().zoom() + delta;
        let next = (self.config.view.clamp_zoom(target) * ZOOM_QUANTUM).round() / ZOOM_QUANTUM;
        self.active_surface_mut().set_zoom(next);
        debug!(side = %self.active, zoom = next, "Zoom changed");
    }

    pub fn zoom_in(&mut self) {
        self.adjust_zoom(self.config.view.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.adjust_zoom(-self.config.view.zoom_step);
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.left.set_tool(tool);
        self.right.set_tool(tool);
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.apply_style();
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = self.config.style.clamp_width(width);
        self.apply_style();
    }

    fn apply_style(&mut self) {
        let (color, width) = (self.color, self.line_width);
        self.left.set_style(color, width);
        self.right.set_style(color, width);
    }

    /// Removes every annotation from the active pane.
    pub fn clear_shapes(&mut self) {
        self.active_surface_mut().clear_shapes();
        info!(side = %self.active, "Annotations cleared");
    }

    // ---------------------------------------------------------------------
    // Pointer input
    // ---------------------------------------------------------------------

    pub fn pointer_down(&mut self, side: Side, ev: PointerEvent) {
        if !self.layout.is_visible(side) {
            return;
        }
        self.surface_mut(side).pointer_down(ev);
        self.process_events();
    }

    pub fn pointer_move(&mut self, side: Side, ev: PointerEvent) {
        self.surface_mut(side).pointer_move(ev);
    }

    pub fn pointer_up(&mut self, side: Side, ev: PointerEvent) {
        self.surface_mut(side).pointer_up(ev);
    }

    pub fn pointer_leave(&mut self, side: Side) {
        self.surface_mut(side).pointer_leave();
    }

    // ---------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------

    /// One animation frame: advances the clocks of the visible panes by `dt`
    /// seconds, paints them at `size` and routes their events.
    pub fn tick(&mut self, dt: f64, size: (u32, u32)) {
        for side in Side::BOTH {
            if !self.layout.is_visible(side) {
                continue;
            }
            let surface = self.surface_mut(side);
            surface.advance(dt);
            surface.paint(size.0, size.1);
        }
        self.process_events();

        // A pane pauses itself when a drawing starts
        let active = self.active_surface();
        if active.has_video() {
            let playing = active.is_playing();
            self.playing = playing;
        }
    }

    fn process_events(&mut self) {
        for side in Side::BOTH {
            for event in self.surface_mut(side).take_events() {
                self.handle_event(side, event);
            }
        }
    }

    fn handle_event(&mut self, side: Side, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Activated => self.activate(side),
            SurfaceEvent::TimeUpdate { time, duration } => {
                if side == self.active {
                    self.global_time = time;
                    self.global_duration = duration;
                }
            }
            SurfaceEvent::MetadataLoaded { duration } => {
                if side == self.active {
                    self.global_duration = duration;
                }
            }
            SurfaceEvent::Scrub { time } => self.linked_scrub(time),
        }
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    /// Starts encoding a snapshot of the active pane on a blocking task.
    ///
    /// Returns `None` when the pane has nothing to export or no Tokio
    /// runtime is running.
    pub fn start_snapshot(&self) -> Option<PendingSnapshot> {
        let side = self.active;
        let job = self.surface(side).begin_snapshot()?;
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("Snapshot requested outside of a Tokio runtime");
            return None;
        }
        let task = tokio::task::spawn_blocking(move || job.render());
        Some(PendingSnapshot { side, task })
    }

    /// Keeps `snapshot` only if its pane still shows the same video.
    pub fn finish_snapshot(&self, side: Side, snapshot: Snapshot) -> Option<Snapshot> {
        if self.surface(side).accepts(&snapshot) {
            Some(snapshot)
        } else {
            debug!(%side, "Discarding stale snapshot");
            None
        }
    }

    /// Snapshot of the active pane at native resolution.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let pending = self.start_snapshot()?;
        let side = pending.side();
        let snapshot = pending.wait().await?;
        self.finish_snapshot(side, snapshot)
    }

    /// File name for a snapshot taken now.
    pub fn snapshot_file_name(&self) -> String {
        format!(
            "{}-{}.jpg",
            self.config.export.file_prefix,
            Utc::now().timestamp_millis()
        )
    }
}

impl fmt::Display for PlayerShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | active: {} | {} | {} | {}x | zoom {:.1}x | {} {} {} | {:.2}s / {:.2}s | {} shapes",
            self.layout,
            self.active,
            if self.sync { "linked" } else { "unlinked" },
            if self.playing { "playing" } else { "paused" },
            self.speed,
            self.zoom(self.active),
            self.tool,
            self.color,
            self.line_width,
            self.global_time,
            self.global_duration,
            self.active_surface().shapes().len(),
        )
    }
}
