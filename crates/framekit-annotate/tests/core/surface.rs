use framekit_annotate::model::{ShapeKind, ShapeType};
use framekit_annotate::surface::{
    AnnotationSurface, Gesture, PointerEvent, SurfaceCommands, SurfaceEvent, Tool,
};
use framekit_annotate::video::VideoSource;
use framekit_core::{Color, Point};

use crate::common::{clip, still, surface_with_video, CONTAINER};

fn drag(surface: &mut AnnotationSurface, from: (f64, f64), to: (f64, f64)) {
    surface.pointer_down(PointerEvent::at(from.0, from.1));
    surface.pointer_move(PointerEvent::at(
        (from.0 + to.0) / 2.0,
        (from.1 + to.1) / 2.0,
    ));
    surface.pointer_move(PointerEvent::at(to.0, to.1));
    surface.pointer_up(PointerEvent::at(to.0, to.1));
}

#[test]
fn test_no_video_only_activates() {
    let mut surface = AnnotationSurface::new();
    surface.set_tool(Tool::Line);
    drag(&mut surface, (10.0, 10.0), (50.0, 50.0));
    assert!(surface.shapes().is_empty());
    assert_eq!(surface.take_events(), vec![SurfaceEvent::Activated]);
}

#[test]
fn test_draw_line_commits_and_selects() {
    let mut surface = surface_with_video();
    surface.play();
    surface.set_tool(Tool::Line);
    surface.set_style(Color::rgb(0x22, 0xc5, 0x5e), 5.0);
    drag(&mut surface, (10.0, 10.0), (50.0, 40.0));

    assert_eq!(surface.shapes().len(), 1);
    assert_eq!(surface.selected_index(), Some(0));
    assert!(surface.gesture().is_idle());
    let shape = &surface.shapes()[0];
    assert_eq!(
        shape.kind,
        ShapeKind::Line {
            start: Point::new(10.0, 10.0),
            end: Point::new(50.0, 40.0)
        }
    );
    assert_eq!(shape.color, Color::rgb(0x22, 0xc5, 0x5e));
    assert_eq!(shape.width, 5.0);
    assert!(!surface.is_playing(), "drawing pauses playback");
}

#[test]
fn test_free_stroke_collects_every_move() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Free);
    surface.pointer_down(PointerEvent::at(10.0, 10.0));
    for i in 1..=5 {
        surface.pointer_move(PointerEvent::at(10.0 + i as f64 * 4.0, 10.0));
    }
    assert_eq!(surface.in_progress().map(|s| s.points().len()), Some(6));
    surface.pointer_up(PointerEvent::at(30.0, 10.0));
    assert_eq!(surface.shapes()[0].points().len(), 6);
}

#[test]
fn test_angle_commits_on_third_point() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Angle);

    surface.pointer_down(PointerEvent::at(100.0, 50.0));
    surface.pointer_up(PointerEvent::at(100.0, 50.0));
    surface.pointer_down(PointerEvent::at(180.0, 50.0));
    surface.pointer_up(PointerEvent::at(180.0, 50.0));
    assert!(surface.shapes().is_empty());
    assert_eq!(surface.pending_angle_points().len(), 2);

    surface.pointer_down(PointerEvent::at(100.0, 5.0));
    assert_eq!(surface.shapes().len(), 1);
    assert!(surface.pending_angle_points().is_empty());
    assert_eq!(surface.selected_index(), Some(0));
    assert_eq!(
        surface.shapes()[0].kind,
        ShapeKind::Angle {
            p1: Point::new(100.0, 50.0),
            p2: Some(Point::new(180.0, 50.0)),
            p3: Some(Point::new(100.0, 5.0)),
        }
    );
}

#[test]
fn test_press_on_shape_selects_instead_of_drawing() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Rect);
    drag(&mut surface, (20.0, 20.0), (60.0, 60.0));
    surface.set_tool(Tool::Line);
    drag(&mut surface, (120.0, 20.0), (180.0, 20.0));
    assert_eq!(surface.selected_index(), Some(1));

    // Inside the rectangle, away from the selected line's handles
    surface.pointer_down(PointerEvent::at(40.0, 40.0));
    assert_eq!(surface.selected_index(), Some(0));
    assert!(surface.gesture().is_idle());
    surface.pointer_up(PointerEvent::at(40.0, 40.0));
    assert_eq!(surface.shapes().len(), 2);
}

#[test]
fn test_press_on_empty_space_deselects() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Line);
    drag(&mut surface, (10.0, 10.0), (40.0, 10.0));
    surface.set_tool(Tool::Select);
    surface.pointer_down(PointerEvent::at(150.0, 80.0));
    assert_eq!(surface.selected_index(), None);
    assert!(surface.gesture().is_idle());
    assert_eq!(surface.shapes().len(), 1);
}

#[test]
fn test_handle_drag_reshapes_selected() {
    let mut surface = surface_with_video();
    surface.play();
    surface.set_tool(Tool::Rect);
    drag(&mut surface, (20.0, 20.0), (60.0, 60.0));
    surface.play();

    surface.pointer_down(PointerEvent::at(61.0, 59.0));
    assert!(matches!(
        surface.gesture(),
        Gesture::DraggingHandle { shape_index: 0, .. }
    ));
    assert!(!surface.is_playing());
    surface.pointer_move(PointerEvent::at(90.0, 80.0));
    surface.pointer_up(PointerEvent::at(90.0, 80.0));

    let bounds = surface.shapes()[0].bounds().unwrap();
    assert_eq!((bounds.min_x(), bounds.min_y()), (20.0, 20.0));
    assert_eq!((bounds.max_x(), bounds.max_y()), (90.0, 80.0));
    assert_eq!(surface.selected_index(), Some(0));
}

#[test]
fn test_drag_accounts_for_zoom_and_pan() {
    let mut surface = surface_with_video();
    surface.set_zoom(2.0);
    surface.set_tool(Tool::Line);
    drag(&mut surface, (100.0, 50.0), (140.0, 50.0));
    assert_eq!(
        surface.shapes()[0].kind,
        ShapeKind::Line {
            start: Point::new(100.0, 50.0),
            end: Point::new(120.0, 50.0)
        }
    );
}

#[test]
fn test_move_tool_pans_only_when_zoomed() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Move);
    drag(&mut surface, (10.0, 10.0), (30.0, 20.0));
    assert_eq!(surface.viewport().pan_x(), 0.0);

    surface.set_zoom(2.0);
    surface.pointer_down(PointerEvent::at(10.0, 10.0));
    assert!(matches!(surface.gesture(), Gesture::Panning { .. }));
    surface.pointer_move(PointerEvent::at(25.0, 18.0));
    surface.pointer_move(PointerEvent::at(0.0, 0.0).with_movement(5.0, -2.0));
    surface.pointer_cancel();
    assert_eq!(surface.viewport().pan_x(), 20.0);
    assert_eq!(surface.viewport().pan_y(), 6.0);
    assert!(surface.shapes().is_empty());

    surface.set_zoom(1.0);
    assert_eq!(surface.viewport().pan_x(), 0.0);
}

#[test]
fn test_leave_commits_drawing() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Circle);
    surface.pointer_down(PointerEvent::at(50.0, 50.0));
    surface.pointer_move(PointerEvent::at(70.0, 50.0));
    surface.pointer_leave();
    assert_eq!(surface.shapes().len(), 1);
    assert_eq!(surface.shapes()[0].radius(), Some(20.0));
}

#[test]
fn test_stray_release_is_ignored() {
    let mut surface = surface_with_video();
    surface.pointer_up(PointerEvent::at(5.0, 5.0));
    surface.pointer_move(PointerEvent::at(6.0, 6.0));
    surface.pointer_cancel();
    assert!(surface.shapes().is_empty());
    assert!(surface.gesture().is_idle());
}

#[test]
fn test_clear_shapes_mid_gesture() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Line);
    drag(&mut surface, (10.0, 10.0), (40.0, 10.0));
    surface.set_tool(Tool::Angle);
    surface.pointer_down(PointerEvent::at(150.0, 80.0));
    surface.set_tool(Tool::Blur);
    surface.pointer_down(PointerEvent::at(160.0, 90.0));
    surface.pointer_move(PointerEvent::at(190.0, 95.0));

    surface.clear_shapes();
    assert!(surface.shapes().is_empty());
    assert_eq!(surface.selected_index(), None);
    assert!(surface.pending_angle_points().is_empty());
    assert!(surface.gesture().is_idle());

    surface.pointer_up(PointerEvent::at(190.0, 95.0));
    assert!(surface.shapes().is_empty());
}

#[test]
fn test_tool_change_keeps_pending_angle() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Angle);
    surface.pointer_down(PointerEvent::at(150.0, 80.0));
    surface.set_tool(Tool::Line);
    surface.set_tool(Tool::Angle);
    assert_eq!(surface.pending_angle_points().len(), 1);
}

#[test]
fn test_load_video_discards_annotations() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Line);
    drag(&mut surface, (10.0, 10.0), (40.0, 10.0));
    let generation = surface.generation();

    surface.load_video(Box::new(still(64, 32, [9, 9, 9, 255])));
    assert!(surface.shapes().is_empty());
    assert_eq!(surface.selected_index(), None);
    assert!(surface.generation() > generation);
    assert!(surface
        .take_events()
        .contains(&SurfaceEvent::MetadataLoaded { duration: 1.0 }));

    surface.clear_video();
    assert!(!surface.has_video());
    assert_eq!(surface.current_time(), 0.0);
    assert_eq!(surface.duration(), 0.0);
}

#[test]
fn test_transport_commands() {
    let mut surface = AnnotationSurface::new();
    surface.load_video(Box::new(clip(10, 8, 8)));

    surface.seek_to(0.5);
    surface.seek_relative(0.05);
    assert!((surface.current_time() - 0.55).abs() < 1e-9);
    surface.seek_relative(-5.0);
    assert_eq!(surface.current_time(), 0.0);

    surface.set_playback_rate(2.0);
    surface.set_playback_rate(0.0);
    surface.set_playback_rate(-1.0);
    assert_eq!(surface.video().map(|v| v.playback_rate()), Some(2.0));

    surface.play();
    surface.advance(0.25);
    assert!((surface.current_time() - 0.5).abs() < 1e-9);
    surface.pause();
    surface.advance(0.25);
    assert!((surface.current_time() - 0.5).abs() < 1e-9);
}

#[test]
fn test_blocked_play_is_swallowed() {
    let mut surface = AnnotationSurface::new();
    surface.load_video(Box::new(clip(2, 8, 8).with_autoplay_blocked(true)));
    surface.play();
    assert!(!surface.is_playing());
}

#[test]
fn test_time_updates_only_when_active() {
    let mut surface = surface_with_video();
    surface.paint(CONTAINER.0, CONTAINER.1);
    assert!(surface.take_events().is_empty());

    surface.set_active(true);
    surface.paint(CONTAINER.0, CONTAINER.1);
    assert_eq!(
        surface.take_events(),
        vec![SurfaceEvent::TimeUpdate {
            time: 0.0,
            duration: 1.0
        }]
    );

    // Unchanged playhead is not reported twice
    surface.paint(CONTAINER.0, CONTAINER.1);
    assert!(surface.take_events().is_empty());
}

#[test]
fn test_scrub_reports_only_when_synced() {
    let mut surface = AnnotationSurface::new();
    surface.load_video(Box::new(clip(10, 8, 8)));
    surface.take_events();

    surface.scrub_to(0.3);
    assert!(surface.take_events().is_empty());
    surface.set_synced(true);
    surface.scrub_to(0.4);
    assert_eq!(surface.take_events(), vec![SurfaceEvent::Scrub { time: 0.4 }]);
}

#[test]
fn test_paint_draws_through_viewport() {
    let mut surface = surface_with_video();
    surface.set_tool(Tool::Line);
    surface.set_style(Color::WHITE, 4.0);
    drag(&mut surface, (60.0, 60.0), (140.0, 60.0));
    surface.set_tool(Tool::Select);
    surface.pointer_down(PointerEvent::at(190.0, 5.0));
    assert_eq!(surface.selected_index(), None);

    surface.set_zoom(2.0);
    let overlay = surface.paint(CONTAINER.0, CONTAINER.1).unwrap();
    assert_eq!((overlay.width(), overlay.height()), CONTAINER);

    // Logical (100, 60) sits at screen (100, 70) at 2x around (100, 50)
    let on_line = overlay.pixel(100, 70).unwrap();
    assert_eq!(on_line.alpha(), 255);
    let off_line = overlay.pixel(100, 30).unwrap();
    assert_eq!(off_line.alpha(), 0);
}

#[test]
fn test_paint_zero_container() {
    let mut surface = surface_with_video();
    assert!(surface.paint(0, 0).is_none());
}

#[test]
fn test_in_progress_shape_type_follows_tool() {
    let mut surface = surface_with_video();
    for (tool, ty) in [
        (Tool::Line, ShapeType::Line),
        (Tool::Rect, ShapeType::Rect),
        (Tool::Circle, ShapeType::Circle),
        (Tool::Blur, ShapeType::Blur),
        (Tool::Free, ShapeType::Free),
    ] {
        surface.clear_shapes();
        surface.set_tool(tool);
        surface.pointer_down(PointerEvent::at(150.0, 80.0));
        assert_eq!(surface.in_progress().map(|s| s.shape_type()), Some(ty));
        surface.pointer_cancel();
    }
}

#[test]
fn test_width_range_bounds_style() {
    let mut surface = AnnotationSurface::new();
    surface.set_style(Color::WHITE, 15.0);
    assert_eq!(surface.style().width, 10.0);

    surface.set_width_range(1.0, 20.0);
    surface.set_style(Color::WHITE, 15.0);
    assert_eq!(surface.style().width, 15.0);

    // Narrowing re-clamps the current width; an inverted range is ignored
    surface.set_width_range(2.0, 12.0);
    assert_eq!(surface.style().width, 12.0);
    surface.set_width_range(9.0, 3.0);
    surface.set_style(Color::WHITE, 15.0);
    assert_eq!(surface.style().width, 12.0);
}
