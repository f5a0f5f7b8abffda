//! Video source abstraction.
//!
//! Decoding is somebody else's job. The annotation surface only needs a
//! playback clock, transport controls and the ability to grab the frame under
//! the playhead, which is what [`VideoSource`] describes. [`FrameSequence`]
//! is an in-memory implementation over already-decoded frames.

use std::path::Path;
use std::sync::Arc;

use framekit_core::{CaptureError, Error, PlaybackError, Result as FrameResult};
use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap};
use tracing::debug;

/// A decoded frame, stored premultiplied and ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pixmap: Pixmap,
}

impl VideoFrame {
    /// Wraps an already premultiplied pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Builds a frame from straight-alpha RGBA pixels.
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self, CaptureError> {
        let (w, h) = image.dimensions();
        let mut pixmap = Pixmap::new(w, h).ok_or(CaptureError::NotReady)?;
        let expected = (w as usize) * (h as usize) * 4;
        let actual = image.as_raw().len();
        if actual != expected {
            return Err(CaptureError::BufferSize { expected, actual });
        }
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self { pixmap })
    }

    /// Converts back to straight-alpha RGBA pixels.
    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_rgba(&self.pixmap)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Demultiplies a pixmap into an `image` buffer.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    out
}

/// Playback clock, transport and frame access of a loaded video.
///
/// Times are in seconds. Before metadata is available `duration` is 0 and
/// `native_size` is `(0, 0)`.
pub trait VideoSource: Send {
    /// Starts playback. Sources may refuse (autoplay policies and the like).
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    fn set_playback_rate(&mut self, rate: f64);

    fn playback_rate(&self) -> f64;

    fn current_time(&self) -> f64;

    /// Moves the playhead; implementations clamp to `[0, duration]`.
    fn set_current_time(&mut self, time: f64);

    fn duration(&self) -> f64;

    /// Intrinsic frame size in pixels.
    fn native_size(&self) -> (u32, u32);

    /// The frame under the playhead.
    fn capture_frame(&self) -> Result<Arc<VideoFrame>, CaptureError>;

    /// Advances the playback clock by `dt` wall-clock seconds.
    ///
    /// Sources driven by an external clock can leave this as a no-op.
    fn advance(&mut self, _dt: f64) {}
}

/// Looping in-memory video made of decoded frames at a fixed rate.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: Vec<Arc<VideoFrame>>,
    fps: f64,
    time: f64,
    rate: f64,
    paused: bool,
    looping: bool,
    tainted: bool,
    autoplay_blocked: bool,
}

impl FrameSequence {
    /// Creates a sequence; a non-positive or non-finite `fps` falls back to 30.
    pub fn new(frames: Vec<VideoFrame>, fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 30.0 };
        Self {
            frames: frames.into_iter().map(Arc::new).collect(),
            fps,
            time: 0.0,
            rate: 1.0,
            paused: true,
            looping: true,
            tainted: false,
            autoplay_blocked: false,
        }
    }

    /// A one-second clip showing a single still image.
    pub fn from_still(image: &RgbaImage) -> Result<Self, CaptureError> {
        Ok(Self::new(vec![VideoFrame::from_rgba_image(image)?], 1.0))
    }

    /// Reads an image file and wraps it as a still clip.
    pub fn open(path: &Path) -> FrameResult<Self> {
        let bytes = std::fs::read(path)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| Error::other(format!("Failed to decode {}: {}", path.display(), e)))?
            .to_rgba8();
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Still frame decoded"
        );
        Ok(Self::from_still(&image)?)
    }

    /// Marks the media as unreadable, so frame capture fails the way a
    /// cross-origin video does.
    pub fn with_tainted(mut self, tainted: bool) -> Self {
        self.tainted = tainted;
        self
    }

    /// Makes `play` fail, the way a blocked autoplay does.
    pub fn with_autoplay_blocked(mut self, blocked: bool) -> Self {
        self.autoplay_blocked = blocked;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_index(&self) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        let idx = (self.time * self.fps).floor().max(0.0) as usize;
        Some(idx.min(self.frames.len() - 1))
    }
}

impl VideoSource for FrameSequence {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.frames.is_empty() {
            return Err(PlaybackError::NoVideo);
        }
        if self.autoplay_blocked {
            return Err(PlaybackError::Rejected {
                reason: "autoplay is not allowed".to_string(),
            });
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rate = rate;
        }
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, time: f64) {
        if time.is_finite() {
            self.time = time.clamp(0.0, self.duration());
        }
    }

    fn duration(&self) -> f64 {
        self.frames.len() as f64 / self.fps
    }

    fn native_size(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0))
    }

    fn capture_frame(&self) -> Result<Arc<VideoFrame>, CaptureError> {
        if self.tainted {
            return Err(CaptureError::Tainted {
                reason: "media is cross-origin".to_string(),
            });
        }
        let idx = self.frame_index().ok_or(CaptureError::NotReady)?;
        Ok(Arc::clone(&self.frames[idx]))
    }

    fn advance(&mut self, dt: f64) {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let duration = self.duration();
        if duration <= 0.0 {
            return;
        }
        let t = self.time + dt * self.rate;
        if t < duration {
            self.time = t;
        } else if self.looping {
            self.time = t % duration;
        } else {
            self.time = duration;
            self.paused = true;
            debug!("Playback reached the end at {:.3}s", duration);
        }
    }
}
