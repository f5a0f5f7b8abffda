use framekit_annotate::viewport::Viewport;
use framekit_core::Point;

#[test]
fn test_viewport_creation() {
    let vp = Viewport::new(640.0, 360.0);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan_x(), 0.0);
    assert_eq!(vp.pan_y(), 0.0);
}

#[test]
fn test_identity_at_unit_zoom() {
    let vp = Viewport::new(640.0, 360.0);
    let p = vp.screen_to_logical(123.0, 45.0);
    assert!((p.x - 123.0).abs() < 1e-9);
    assert!((p.y - 45.0).abs() < 1e-9);
}

#[test]
fn test_zoom_pivots_on_center() {
    let mut vp = Viewport::new(200.0, 100.0);
    vp.set_zoom(2.0);
    let center = vp.screen_to_logical(100.0, 50.0);
    assert!((center.x - 100.0).abs() < 1e-9);
    assert!((center.y - 50.0).abs() < 1e-9);

    // Top-left corner of the screen shows the logical point halfway to center
    let corner = vp.screen_to_logical(0.0, 0.0);
    assert!((corner.x - 50.0).abs() < 1e-9);
    assert!((corner.y - 25.0).abs() < 1e-9);
}

#[test]
fn test_roundtrip_conversion() {
    for zoom in [1.0, 2.5, 4.0] {
        let mut vp = Viewport::new(800.0, 450.0);
        vp.set_zoom(zoom);
        vp.set_pan(75.0, -125.0);

        let original = Point::new(123.45, 456.78);
        let (sx, sy) = vp.logical_to_screen(&original);
        let roundtrip = vp.screen_to_logical(sx, sy);

        assert!((roundtrip.x - original.x).abs() < 0.01, "zoom {}", zoom);
        assert!((roundtrip.y - original.y).abs() < 0.01, "zoom {}", zoom);
    }
}

#[test]
fn test_transform_matches_logical_to_screen() {
    let mut vp = Viewport::new(300.0, 200.0);
    vp.set_zoom(2.5);
    vp.pan_by(12.0, -8.0);

    let p = Point::new(40.0, 170.0);
    let (ex, ey) = vp.logical_to_screen(&p);
    let mut mapped = [tiny_skia::Point::from_xy(p.x as f32, p.y as f32)];
    vp.transform().map_points(&mut mapped);
    assert!((mapped[0].x as f64 - ex).abs() < 0.01);
    assert!((mapped[0].y as f64 - ey).abs() < 0.01);
}

#[test]
fn test_unit_zoom_resets_pan() {
    let mut vp = Viewport::new(300.0, 200.0);
    vp.set_zoom(3.0);
    vp.pan_by(40.0, 20.0);
    vp.set_zoom(1.4);
    assert_eq!(vp.pan_x(), 40.0);
    vp.set_zoom(1.0);
    assert_eq!((vp.pan_x(), vp.pan_y()), (0.0, 0.0));
}

#[test]
fn test_zoom_rejects_invalid() {
    let mut vp = Viewport::new(300.0, 200.0);
    vp.set_zoom(2.0);
    vp.set_zoom(0.0);
    vp.set_zoom(f64::NAN);
    assert_eq!(vp.zoom(), 2.0);
}

#[test]
fn test_letterbox_wide_video() {
    let vp = Viewport::new(200.0, 200.0);
    let r = vp.letterbox(1920, 1080);
    assert!((r.width - 200.0).abs() < 1e-9);
    assert!((r.height - 112.5).abs() < 1e-9);
    assert!((r.y - 43.75).abs() < 1e-9);
}

#[test]
fn test_letterbox_tall_video() {
    let vp = Viewport::new(400.0, 200.0);
    let r = vp.letterbox(100, 200);
    assert_eq!(r.x, 150.0);
    assert_eq!(r.width, 100.0);
    assert_eq!(r.height, 200.0);
}

#[test]
fn test_display() {
    let mut vp = Viewport::new(300.0, 200.0);
    vp.set_zoom(2.0);
    vp.set_pan(1.0, -2.5);
    assert_eq!(vp.to_string(), "Zoom: 2.00x | Pan: (1.0, -2.5)");
}
