use framekit_annotate::surface::{PointerEvent, SurfaceCommands, Tool};
use framekit_core::Color;
use framekit_player::{Key, Layout, PlayerShell, Side};
use framekit_settings::Config;

use crate::common::{clip, split_shell, PANE};

#[test]
fn test_single_layout_keeps_left_active() {
    let mut shell = PlayerShell::default();
    assert_eq!(shell.layout(), Layout::Single);
    shell.activate(Side::Right);
    assert_eq!(shell.active_side(), Side::Left);

    shell.set_layout(Layout::Split);
    shell.activate(Side::Right);
    assert_eq!(shell.active_side(), Side::Right);
    assert!(shell.surface(Side::Right).is_active());
    assert!(!shell.surface(Side::Left).is_active());

    shell.set_layout(Layout::Single);
    assert_eq!(shell.active_side(), Side::Left);
    assert!(shell.surface(Side::Left).is_active());
}

#[test]
fn test_pointer_down_activates_pane() {
    let mut shell = split_shell();
    shell.pointer_down(Side::Right, PointerEvent::at(10.0, 10.0));
    assert_eq!(shell.active_side(), Side::Right);
}

#[test]
fn test_toggle_play_unlinked_drives_active_only() {
    let mut shell = split_shell();
    shell.toggle_play();
    assert!(shell.is_playing());
    assert!(shell.surface(Side::Left).is_playing());
    assert!(!shell.surface(Side::Right).is_playing());

    shell.toggle_play();
    assert!(!shell.is_playing());
    assert!(!shell.surface(Side::Left).is_playing());
}

#[test]
fn test_toggle_play_linked_drives_both() {
    let mut shell = split_shell();
    shell.set_sync(true);
    shell.handle_key(Key::Space);
    assert!(shell.surface(Side::Left).is_playing());
    assert!(shell.surface(Side::Right).is_playing());
}

#[test]
fn test_arrow_keys_step() {
    let mut shell = split_shell();
    shell.handle_key(Key::ArrowRight);
    shell.handle_key(Key::ArrowRight);
    assert!((shell.surface(Side::Left).current_time() - 0.1).abs() < 1e-9);
    assert_eq!(shell.surface(Side::Right).current_time(), 0.0);

    shell.handle_key(Key::ArrowLeft);
    assert!((shell.surface(Side::Left).current_time() - 0.05).abs() < 1e-9);
}

#[test]
fn test_seek_linked_moves_both() {
    let mut shell = split_shell();
    shell.set_sync(true);
    shell.seek(0.3);
    for side in Side::BOTH {
        assert!((shell.surface(side).current_time() - 0.3).abs() < 1e-9);
    }
}

#[test]
fn test_change_speed_applies_to_both() {
    let mut shell = split_shell();
    shell.change_speed(2.0);
    assert_eq!(shell.speed(), 2.0);
    for side in Side::BOTH {
        let rate = shell.surface(side).video().unwrap().playback_rate();
        assert_eq!(rate, 2.0);
    }

    shell.change_speed(0.0);
    shell.change_speed(f64::NAN);
    assert_eq!(shell.speed(), 2.0);
}

#[test]
fn test_new_video_inherits_speed() {
    let mut shell = PlayerShell::default();
    shell.change_speed(0.5);
    shell.load_video(Side::Left, clip(32, 18));
    let rate = shell.surface(Side::Left).video().unwrap().playback_rate();
    assert_eq!(rate, 0.5);
}

#[test]
fn test_zoom_is_clamped_and_per_pane() {
    let mut shell = split_shell();
    for _ in 0..30 {
        shell.zoom_in();
    }
    assert_eq!(shell.zoom(Side::Left), 4.0);
    assert_eq!(shell.zoom(Side::Right), 1.0);

    shell.adjust_zoom(-10.0);
    assert_eq!(shell.zoom(Side::Left), 1.0);
}

#[test]
fn test_zoom_steps_return_to_unit() {
    let mut shell = split_shell();
    for _ in 0..3 {
        shell.zoom_in();
    }
    assert!((shell.zoom(Side::Left) - 1.6).abs() < 1e-9);
    for _ in 0..3 {
        shell.zoom_out();
    }
    assert_eq!(shell.zoom(Side::Left), 1.0);
    assert!(!shell.surface(Side::Left).viewport().is_zoomed_in());
}

#[test]
fn test_style_forwarded_to_both() {
    let mut shell = split_shell();
    let green = Color::from_hex("#22c55e").unwrap();
    shell.set_tool(Tool::Circle);
    shell.set_color(green);
    shell.set_line_width(42.0);

    assert_eq!(shell.line_width(), 10.0);
    for side in Side::BOTH {
        let surface = shell.surface(side);
        assert_eq!(surface.tool(), Tool::Circle);
        assert_eq!(surface.style().color, green);
        assert_eq!(surface.style().width, 10.0);
    }
}

#[test]
fn test_clear_shapes_on_active_only() {
    let mut shell = split_shell();
    shell.set_tool(Tool::Line);
    for side in Side::BOTH {
        shell.pointer_down(side, PointerEvent::at(20.0, 20.0));
        shell.pointer_move(side, PointerEvent::at(60.0, 40.0));
        shell.pointer_up(side, PointerEvent::at(60.0, 40.0));
    }
    // The last pointer down activated the right pane
    assert_eq!(shell.active_side(), Side::Right);

    shell.clear_shapes();
    assert!(shell.surface(Side::Right).shapes().is_empty());
    assert_eq!(shell.surface(Side::Left).shapes().len(), 1);
}

#[test]
fn test_global_scrub_unlinked() {
    let mut shell = split_shell();
    shell.global_scrub(0.4);
    assert_eq!(shell.global_time(), 0.4);
    assert!((shell.surface(Side::Left).current_time() - 0.4).abs() < 1e-9);
    assert_eq!(shell.surface(Side::Right).current_time(), 0.0);
}

#[test]
fn test_global_scrub_linked() {
    let mut shell = split_shell();
    shell.set_sync(true);
    shell.global_scrub(0.7);
    for side in Side::BOTH {
        assert!((shell.surface(side).current_time() - 0.7).abs() < 1e-9);
    }
}

#[test]
fn test_pane_scrub_follows_when_linked() {
    let mut shell = split_shell();
    shell.scrub(Side::Right, 0.5);
    assert_eq!(shell.surface(Side::Left).current_time(), 0.0);

    shell.set_sync(true);
    shell.scrub(Side::Right, 0.6);
    assert!((shell.surface(Side::Left).current_time() - 0.6).abs() < 1e-9);
}

#[test]
fn test_tick_reports_active_time() {
    let mut shell = split_shell();
    shell.tick(0.016, PANE);
    assert_eq!(shell.global_duration(), 1.0);
    assert_eq!(shell.global_time(), 0.0);

    shell.toggle_play();
    shell.tick(0.25, PANE);
    assert!((shell.global_time() - 0.25).abs() < 1e-9);
    // The right pane is paused and unlinked
    assert_eq!(shell.surface(Side::Right).current_time(), 0.0);
}

#[test]
fn test_drawing_pause_is_reflected_after_tick() {
    let mut shell = split_shell();
    shell.toggle_play();
    shell.set_tool(Tool::Rect);
    shell.pointer_down(Side::Left, PointerEvent::at(20.0, 20.0));
    shell.tick(0.016, PANE);
    assert!(!shell.is_playing());
}

#[test]
fn test_hidden_pane_does_not_run() {
    let mut shell = split_shell();
    shell.set_sync(true);
    shell.toggle_play();
    shell.set_layout(Layout::Single);
    shell.tick(0.5, PANE);
    assert!((shell.surface(Side::Left).current_time() - 0.5).abs() < 1e-9);
    assert_eq!(shell.surface(Side::Right).current_time(), 0.0);
}

#[test]
fn test_clear_active_video_resets_clock() {
    let mut shell = split_shell();
    shell.toggle_play();
    shell.tick(0.3, PANE);
    assert!(shell.global_time() > 0.0);

    shell.clear_video(Side::Left);
    assert_eq!(shell.global_time(), 0.0);
    assert_eq!(shell.global_duration(), 0.0);
    assert!(!shell.is_playing());
    assert!(!shell.surface(Side::Left).has_video());
}

#[test]
fn test_clear_inactive_video_keeps_clock() {
    let mut shell = split_shell();
    shell.global_scrub(0.2);
    shell.clear_video(Side::Right);
    assert_eq!(shell.global_time(), 0.2);
    assert!(shell.surface(Side::Left).has_video());
}

#[test]
fn test_status_line() {
    let shell = split_shell();
    let status = shell.to_string();
    assert!(status.starts_with("split | active: left | unlinked | paused | 1x"));
    assert!(status.ends_with("0 shapes"));
}

#[test]
fn test_configured_width_range_reaches_surfaces() {
    let mut config = Config::default();
    config.style.max_width = 20.0;
    let mut shell = PlayerShell::new(config);

    shell.set_line_width(18.0);
    assert_eq!(shell.line_width(), 18.0);
    for side in Side::BOTH {
        assert_eq!(shell.surface(side).style().width, 18.0);
    }

    shell.set_line_width(50.0);
    assert_eq!(shell.surface(Side::Left).style().width, 20.0);
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let mut config = Config::default();
    config.style.min_width = 8.0;
    config.style.max_width = 2.0;
    let mut shell = PlayerShell::new(config);

    assert_eq!(shell.config(), &Config::default());
    shell.set_line_width(6.0);
    assert_eq!(shell.surface(Side::Left).style().width, 6.0);
}
