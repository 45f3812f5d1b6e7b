use egui::{CursorIcon, PointerButton, Pos2, Rect, Vec2, pos2};

use super::*;
use crate::frame::{FrameId, FrameOptions};

fn window() -> ResizableWindow {
    let mut w = ResizableWindow::new(Rect::from_min_size(pos2(100.0, 100.0), Vec2::new(400.0, 300.0)));
    w.min_size = Vec2::new(100.0, 80.0);
    w.max_size = Vec2::new(800.0, 600.0);
    w
}

fn handler(mode: FilterMode) -> ResizeHandler {
    crate::init_test_logger();
    ResizeHandler::new(mode, &DockingConfig::default())
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + unit * (hi - lo)
    }
}

#[test]
fn classification_covers_edges_and_corners() {
    let size = Vec2::new(400.0, 300.0);
    let classify = |x: f32, y: f32| CursorPosition::classify(Vec2::new(x, y), size, 4.0);

    assert_eq!(classify(1.0, 1.0), CursorPosition::TOP_LEFT);
    assert_eq!(classify(399.0, 1.0), CursorPosition::TOP_RIGHT);
    assert_eq!(classify(1.0, 299.0), CursorPosition::BOTTOM_LEFT);
    assert_eq!(classify(399.0, 299.0), CursorPosition::BOTTOM_RIGHT);
    assert_eq!(classify(-3.0, 150.0), CursorPosition::LEFT);
    assert_eq!(classify(400.0, 150.0), CursorPosition::RIGHT);
    assert_eq!(classify(200.0, 4.0), CursorPosition::TOP);
    assert_eq!(classify(200.0, 293.0), CursorPosition::BOTTOM);
    assert_eq!(classify(200.0, 150.0), CursorPosition::UNDEFINED);
    assert_eq!(classify(200.0, 291.0), CursorPosition::UNDEFINED);
}

#[test]
fn cursor_shapes_follow_the_zone() {
    assert_eq!(CursorPosition::TOP_LEFT.cursor_icon(), CursorIcon::ResizeNwSe);
    assert_eq!(CursorPosition::BOTTOM_RIGHT.cursor_icon(), CursorIcon::ResizeNwSe);
    assert_eq!(CursorPosition::TOP_RIGHT.cursor_icon(), CursorIcon::ResizeNeSw);
    assert_eq!(CursorPosition::BOTTOM_LEFT.cursor_icon(), CursorIcon::ResizeNeSw);
    assert_eq!(CursorPosition::TOP.cursor_icon(), CursorIcon::ResizeVertical);
    assert_eq!(CursorPosition::LEFT.cursor_icon(), CursorIcon::ResizeHorizontal);
    assert_eq!(CursorPosition::UNDEFINED.cursor_icon(), CursorIcon::Default);
}

#[test]
fn points_far_outside_are_undefined() {
    let h = handler(FilterMode::Global);
    let w = window();
    // Lined up with the left edge, but far below the window.
    assert!(h.cursor_position(&w, pos2(100.0, 900.0)).is_undefined());
    assert_eq!(h.cursor_position(&w, pos2(98.0, 250.0)), CursorPosition::LEFT);
}

#[test]
fn dragging_the_right_edge_resizes() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();

    assert!(h.handle_event(&mut w, &PointerEvent::press(pos2(499.0, 250.0), PointerButton::Primary)));
    assert_eq!(h.session().unwrap().cursor_position, CursorPosition::RIGHT);
    assert_eq!(h.cursor_icon(), CursorIcon::ResizeHorizontal);

    assert!(h.handle_event(&mut w, &PointerEvent::moved(pos2(550.0, 260.0), true)));
    assert_eq!(w.geometry, Rect::from_min_max(pos2(100.0, 100.0), pos2(550.0, 400.0)));

    assert!(h.handle_event(&mut w, &PointerEvent::release(pos2(550.0, 260.0), PointerButton::Primary)));
    assert!(!h.is_resizing());
}

#[test]
fn dragging_the_top_left_corner_is_clamped_to_max() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();

    h.handle_event(&mut w, &PointerEvent::press(pos2(101.0, 101.0), PointerButton::Primary));
    h.handle_event(&mut w, &PointerEvent::moved(pos2(-1000.0, -1000.0), true));
    assert_eq!(w.geometry, Rect::from_min_max(pos2(-300.0, -200.0), pos2(500.0, 400.0)));

    h.handle_event(&mut w, &PointerEvent::moved(pos2(1000.0, 1000.0), true));
    assert_eq!(w.geometry, Rect::from_min_max(pos2(400.0, 320.0), pos2(500.0, 400.0)));
}

#[test]
fn clamped_geometry_stays_within_bounds() {
    let cursors = [
        CursorPosition::LEFT,
        CursorPosition::RIGHT,
        CursorPosition::TOP,
        CursorPosition::BOTTOM,
        CursorPosition::TOP_LEFT,
        CursorPosition::TOP_RIGHT,
        CursorPosition::BOTTOM_LEFT,
        CursorPosition::BOTTOM_RIGHT,
    ];
    let mut rng = Rng::new(1);
    for _ in 0..2000 {
        let min = Vec2::new(rng.next_f32(0.0, 300.0), rng.next_f32(0.0, 300.0));
        let max = min + Vec2::new(rng.next_f32(0.0, 500.0), rng.next_f32(0.0, 500.0));
        let size = Vec2::new(rng.next_f32(min.x, max.x), rng.next_f32(min.y, max.y));
        let old = Rect::from_min_size(pos2(rng.next_f32(-500.0, 500.0), rng.next_f32(-500.0, 500.0)), size);
        let pointer = pos2(rng.next_f32(-3000.0, 3000.0), rng.next_f32(-3000.0, 3000.0));

        for cursor in cursors {
            let new = resized_geometry(old, cursor, pointer, min, max);
            assert!(
                new.width() >= min.x - 1e-2 && new.width() <= max.x + 1e-2,
                "{old:?} {cursor:?} {pointer:?} -> {new:?} (min {min:?} max {max:?})"
            );
            assert!(new.height() >= min.y - 1e-2 && new.height() <= max.y + 1e-2);

            if !cursor.contains(CursorPosition::LEFT) {
                assert_eq!(new.min.x, old.min.x);
            }
            if !cursor.contains(CursorPosition::RIGHT) {
                assert_eq!(new.max.x, old.max.x);
            }
            if !cursor.contains(CursorPosition::TOP) {
                assert_eq!(new.min.y, old.min.y);
            }
            if !cursor.contains(CursorPosition::BOTTOM) {
                assert_eq!(new.max.y, old.max.y);
            }
        }
    }
}

#[test]
fn maximized_windows_are_left_alone() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();
    w.maximized = true;
    let before = w.geometry;

    assert!(!h.handle_event(&mut w, &PointerEvent::press(pos2(499.0, 250.0), PointerButton::Primary)));
    assert!(!h.is_resizing());
    assert!(!h.handle_event(&mut w, &PointerEvent::moved(pos2(700.0, 250.0), true)));
    assert!(!h.handle_event(&mut w, &PointerEvent::release(pos2(700.0, 250.0), PointerButton::Primary)));
    assert_eq!(w.geometry, before);
}

#[test]
fn secondary_press_is_consumed_without_starting_a_session() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();
    assert!(h.handle_event(&mut w, &PointerEvent::press(pos2(499.0, 250.0), PointerButton::Secondary)));
    assert!(!h.is_resizing());
    assert!(!h.handle_event(&mut w, &PointerEvent::release(pos2(499.0, 250.0), PointerButton::Secondary)));
}

#[test]
fn press_away_from_the_border_is_ignored() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();
    assert!(!h.handle_event(&mut w, &PointerEvent::press(pos2(300.0, 250.0), PointerButton::Primary)));
    assert!(!h.is_resizing());
}

#[test]
fn moving_without_the_button_ends_the_session() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();
    h.handle_event(&mut w, &PointerEvent::press(pos2(499.0, 250.0), PointerButton::Primary));
    let before = w.geometry;

    // Hovering the right edge: consumed for the cursor, but no resize.
    assert!(h.handle_event(&mut w, &PointerEvent::moved(pos2(500.0, 250.0), false)));
    assert!(!h.is_resizing());
    assert_eq!(w.geometry, before);

    assert!(!h.handle_event(&mut w, &PointerEvent::moved(pos2(300.0, 250.0), false)));
}

#[test]
fn target_only_mode_ignores_other_widgets() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();
    let press = PointerEvent::press(pos2(499.0, 250.0), PointerButton::Primary).elsewhere();
    assert!(!h.handle_event(&mut w, &press));
    assert!(!h.is_resizing());
}

#[test]
fn target_only_mode_requires_a_top_level_target() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut frame = Frame::new(FrameId::from_u64(1), FrameOptions::default(), Vec2::new(80.0, 90.0));
    frame.set_geometry(Rect::from_min_size(Pos2::ZERO, Vec2::new(300.0, 300.0)));
    assert!(!h.handle_event(&mut frame, &PointerEvent::press(pos2(299.0, 150.0), PointerButton::Primary)));

    let mut h = handler(FilterMode::Global);
    assert!(h.handle_event(&mut frame, &PointerEvent::press(pos2(299.0, 150.0), PointerButton::Primary)));
    h.handle_event(&mut frame, &PointerEvent::moved(pos2(0.0, 150.0), true));
    assert_eq!(frame.geometry().width(), 80.0);
}

#[test]
fn global_mode_only_resizes_for_events_on_the_target() {
    let mut h = handler(FilterMode::Global);
    let mut w = window();
    h.handle_event(&mut w, &PointerEvent::press(pos2(499.0, 250.0), PointerButton::Primary));
    let before = w.geometry;

    assert!(!h.handle_event(&mut w, &PointerEvent::moved(pos2(600.0, 250.0), true).elsewhere()));
    assert_eq!(w.geometry, before);
    assert!(h.is_resizing());

    h.handle_event(&mut w, &PointerEvent::moved(pos2(600.0, 250.0), true));
    assert_eq!(w.geometry.max.x, 600.0);
}

#[test]
fn cursor_requests_depend_on_filter_mode() {
    let mut h = handler(FilterMode::Global);
    let mut w = window();
    h.handle_event(&mut w, &PointerEvent::moved(pos2(300.0, 101.0), false));
    assert_eq!(h.take_cursor_request(), Some(CursorRequest::Override(CursorIcon::ResizeVertical)));
    assert_eq!(h.take_cursor_request(), None);
    h.handle_event(&mut w, &PointerEvent::moved(pos2(300.0, 250.0), false));
    assert_eq!(h.take_cursor_request(), Some(CursorRequest::RestoreOverride));

    let mut h = handler(FilterMode::TargetOnly);
    h.handle_event(&mut w, &PointerEvent::moved(pos2(101.0, 399.0), false));
    assert_eq!(h.take_cursor_request(), Some(CursorRequest::Target(CursorIcon::ResizeNeSw)));
    h.handle_event(&mut w, &PointerEvent::moved(pos2(300.0, 250.0), false));
    assert_eq!(h.take_cursor_request(), Some(CursorRequest::Target(CursorIcon::Default)));
    assert_eq!(h.cursor_icon(), CursorIcon::Default);
}

#[test]
fn disabled_handler_ignores_everything() {
    let mut h = handler(FilterMode::TargetOnly);
    h.disabled = true;
    let mut w = window();
    assert!(!h.handle_event(&mut w, &PointerEvent::press(pos2(499.0, 250.0), PointerButton::Primary)));
    assert!(!h.handle_event(&mut w, &PointerEvent::moved(pos2(499.0, 250.0), false)));
    assert!(h.take_cursor_request().is_none());
}

#[test]
fn cancel_restores_the_origin_geometry() {
    let mut h = handler(FilterMode::TargetOnly);
    let mut w = window();
    let before = w.geometry;
    h.handle_event(&mut w, &PointerEvent::press(pos2(300.0, 399.0), PointerButton::Primary));
    h.handle_event(&mut w, &PointerEvent::moved(pos2(300.0, 450.0), true));
    assert_ne!(w.geometry, before);

    h.cancel(&mut w);
    assert_eq!(w.geometry, before);
    assert!(!h.is_resizing());
}
