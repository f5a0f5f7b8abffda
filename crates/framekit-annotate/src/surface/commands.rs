//! Command interface used by the player shell.

use tracing::debug;

use super::{AnnotationSurface, Gesture};
use crate::export::Snapshot;

/// Transport and annotation commands a shell can issue to a surface.
///
/// Every command is safe to call without a loaded video; it then does nothing
/// and queries report zero.
pub trait SurfaceCommands {
    /// Starts playback. A refusal from the video is logged and swallowed.
    fn play(&mut self);
    fn pause(&mut self);
    /// Applies a playback rate; non-positive or non-finite rates are ignored.
    fn set_playback_rate(&mut self, rate: f64);
    fn seek_to(&mut self, time: f64);
    fn seek_relative(&mut self, delta: f64);
    /// Drops every shape, the selection and any gesture or pending angle.
    fn clear_shapes(&mut self);
    /// Renders a snapshot synchronously.
    fn snapshot(&self) -> Option<Snapshot>;
    fn has_video(&self) -> bool;
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn is_playing(&self) -> bool;
}

impl SurfaceCommands for AnnotationSurface {
    fn play(&mut self) {
        if let Some(v) = self.video.as_mut() {
            if let Err(e) = v.play() {
                debug!("Play request ignored: {}", e);
            }
        }
    }

    fn pause(&mut self) {
        self.pause_video();
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            debug!(rate, "Ignoring invalid playback rate");
            return;
        }
        if let Some(v) = self.video.as_mut() {
            v.set_playback_rate(rate);
        }
    }

    fn seek_to(&mut self, time: f64) {
        if let Some(v) = self.video.as_mut() {
            v.set_current_time(time);
        }
    }

    fn seek_relative(&mut self, delta: f64) {
        if let Some(v) = self.video.as_mut() {
            let t = v.current_time() + delta;
            v.set_current_time(t);
        }
    }

    fn clear_shapes(&mut self) {
        self.shapes.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.angle_points.clear();
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.begin_snapshot()?.render()
    }

    fn has_video(&self) -> bool {
        self.video.is_some()
    }

    fn current_time(&self) -> f64 {
        self.video.as_ref().map_or(0.0, |v| v.current_time())
    }

    fn duration(&self) -> f64 {
        self.video.as_ref().map_or(0.0, |v| v.duration())
    }

    fn is_playing(&self) -> bool {
        self.video.as_ref().is_some_and(|v| !v.is_paused())
    }
}
