use framekit_annotate::surface::AnnotationSurface;
use framekit_annotate::video::{FrameSequence, VideoFrame};
use image::{Rgba, RgbaImage};

pub const CONTAINER: (u32, u32) = (200, 100);

/// Solid-color still clip.
pub fn still(width: u32, height: u32, rgba: [u8; 4]) -> FrameSequence {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    FrameSequence::from_still(&img).unwrap()
}

/// A 1 second clip of `frames` frames at 10 fps.
pub fn clip(frames: usize, width: u32, height: u32) -> FrameSequence {
    let frames = (0..frames)
        .map(|i| {
            let img = RgbaImage::from_pixel(width, height, Rgba([i as u8, i as u8, i as u8, 255]));
            VideoFrame::from_rgba_image(&img).unwrap()
        })
        .collect();
    FrameSequence::new(frames, 10.0)
}

/// Surface with a 400x200 black still, laid out at [`CONTAINER`].
pub fn surface_with_video() -> AnnotationSurface {
    let mut surface = AnnotationSurface::new();
    surface.load_video(Box::new(still(400, 200, [0, 0, 0, 255])));
    surface.set_container_size(CONTAINER.0, CONTAINER.1);
    surface.take_events();
    surface
}
