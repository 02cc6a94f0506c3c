// Host-side tests for drag tracking, the floating panel and clip selection.

use dash_core::clip::{bar_count, drag_clip, ClipHandle, ClipOffsets};
use dash_core::config::{DashboardConfig, PanelConfig};
use dash_core::drag::{drag_transition, DragEffect, DragEvent, DragMove, DragState, DragTracker, PointerSample};
use dash_core::frame::FrameTick;
use dash_core::panel::{nearest_edge, resize_with_aspect, snap_to_edge, DraggableContainer, Edge, Gesture};
use glam::DVec2;

fn p(x: f64, y: f64) -> PointerSample {
    PointerSample::new(x, y)
}

#[test]
fn tracker_reports_deltas_from_origin() {
    let mut t: DragTracker<f64> = DragTracker::new();
    assert!(!t.is_dragging());
    assert!(t.pointer_down(p(100.0, 100.0), 7.0));
    assert!(t.is_dragging());

    let mv = t.pointer_move(p(130.0, 90.0)).expect("move while dragging");
    assert_eq!(mv, DragMove { dx: 30.0, dy: -10.0, prev: 7.0 });
    // deltas stay relative to the origin, not the previous move
    let mv = t.pointer_move(p(160.0, 100.0)).expect("move");
    assert_eq!((mv.dx, mv.dy), (60.0, 0.0));

    let session = t.pointer_up().expect("ended");
    assert_eq!(session.base, 7.0);
    assert!(!t.is_dragging());
    assert!(t.pointer_move(p(0.0, 0.0)).is_none());
    assert!(t.pointer_up().is_none());
}

#[test]
fn precision_modifier_scales_deltas_down() {
    let mut t: DragTracker<()> = DragTracker::new();
    t.pointer_down(p(0.0, 0.0), ());
    let mv = t.pointer_move(p(90.0, -30.0).with_precision(true)).expect("move");
    assert_eq!((mv.dx, mv.dy), (30.0, -10.0));

    let mut coarse: DragTracker<()> = DragTracker::with_precision_factor(1.0);
    coarse.pointer_down(p(0.0, 0.0), ());
    let mv = coarse.pointer_move(p(90.0, 0.0).with_precision(true)).expect("move");
    assert_eq!(mv.dx, 90.0);
}

#[test]
fn precision_factor_comes_from_config() {
    let cfg = DashboardConfig::from_json(r#"{ "drag": { "precision_factor": 10 } }"#)
        .expect("valid override");
    let mut t: DragTracker<()> = DragTracker::from_config(&cfg.drag);
    t.pointer_down(p(0.0, 0.0), ());
    let mv = t.pointer_move(p(100.0, 50.0).with_precision(true)).expect("move");
    assert_eq!((mv.dx, mv.dy), (10.0, 5.0));
    // without the modifier the factor does not apply
    let mv = t.pointer_move(p(100.0, 50.0)).expect("move");
    assert_eq!((mv.dx, mv.dy), (100.0, 50.0));
}

#[test]
fn second_pointer_down_is_ignored() {
    let mut t: DragTracker<i32> = DragTracker::new();
    assert!(t.pointer_down(p(10.0, 10.0), 1));
    assert!(!t.pointer_down(p(500.0, 500.0), 2));
    let mv = t.pointer_move(p(20.0, 10.0)).expect("move");
    assert_eq!(mv.dx, 10.0);
    assert_eq!(mv.prev, 1);
}

#[test]
fn transition_function_is_pure() {
    let (s, e) = drag_transition(DragState::<u8>::Idle, DragEvent::Up, 3.0);
    assert_eq!(s, DragState::Idle);
    assert_eq!(e, DragEffect::None);

    let (s, e) = drag_transition(
        DragState::Idle,
        DragEvent::Down {
            pointer: p(1.0, 2.0),
            base: 9u8,
        },
        3.0,
    );
    assert_eq!(e, DragEffect::Started);
    let (s, e) = drag_transition(s, DragEvent::Move(p(4.0, 2.0)), 3.0);
    assert!(matches!(s, DragState::Dragging(_)));
    assert_eq!(e, DragEffect::Moved(DragMove { dx: 3.0, dy: 0.0, prev: 9 }));
}

#[test]
fn snaps_to_nearest_edge() {
    let viewport = DVec2::new(1000.0, 800.0);
    let size = DVec2::new(200.0, 200.0);
    let (edge, snapped) =
        snap_to_edge(DVec2::new(5.0, 400.0), size, viewport, 16.0, f64::INFINITY).expect("snap");
    assert_eq!(edge, Edge::Left);
    assert_eq!(snapped, DVec2::new(16.0, 400.0));

    let (edge, snapped) =
        snap_to_edge(DVec2::new(400.0, 590.0), size, viewport, 16.0, f64::INFINITY).expect("snap");
    assert_eq!(edge, Edge::Bottom);
    assert_eq!(snapped, DVec2::new(400.0, 584.0));

    let (edge, snapped) =
        snap_to_edge(DVec2::new(790.0, 300.0), size, viewport, 16.0, f64::INFINITY).expect("snap");
    assert_eq!(edge, Edge::Right);
    assert_eq!(snapped.x, 784.0);
}

#[test]
fn equal_distances_resolve_in_edge_order() {
    let viewport = DVec2::new(1000.0, 1000.0);
    let size = DVec2::new(100.0, 100.0);
    // dead centre: all four distances are 450
    assert_eq!(nearest_edge(DVec2::new(450.0, 450.0), size, viewport).0, Edge::Left);
    // right and top tie at 50
    assert_eq!(nearest_edge(DVec2::new(850.0, 50.0), size, viewport).0, Edge::Right);
    // top and bottom tie at 100, left is further
    assert_eq!(nearest_edge(DVec2::new(300.0, 100.0), DVec2::new(100.0, 800.0), viewport).0, Edge::Top);
}

#[test]
fn threshold_limits_snapping() {
    let viewport = DVec2::new(1000.0, 800.0);
    let size = DVec2::new(200.0, 200.0);
    assert!(snap_to_edge(DVec2::new(300.0, 300.0), size, viewport, 16.0, 50.0).is_none());
    assert!(snap_to_edge(DVec2::new(30.0, 300.0), size, viewport, 16.0, 50.0).is_some());
}

#[test]
fn resize_respects_aspect_and_maxima() {
    let free = resize_with_aspect(DVec2::new(320.0, 180.0), None, None, None);
    assert_eq!(free, DVec2::new(320.0, 180.0));

    let wide = resize_with_aspect(DVec2::new(320.0, 999.0), Some(16.0 / 9.0), None, None);
    assert!((wide.y - 180.0).abs() < 1e-9);
    assert_eq!(wide.x, 320.0);

    let tall = resize_with_aspect(DVec2::new(999.0, 400.0), Some(0.5), None, None);
    assert_eq!(tall, DVec2::new(200.0, 400.0));

    let capped = resize_with_aspect(DVec2::new(900.0, 900.0), Some(1.0), Some(400.0), None);
    assert_eq!(capped, DVec2::new(400.0, 400.0));

    let negative = resize_with_aspect(DVec2::new(-20.0, 50.0), None, None, None);
    assert_eq!(negative, DVec2::new(0.0, 50.0));
}

#[test]
fn container_follows_drag_and_snaps_on_release() {
    let mut panel = DraggableContainer::new(PanelConfig::default());
    assert_eq!(panel.render_position(), DVec2::new(16.0, 16.0));
    assert_eq!(panel.size(), DVec2::new(250.0, 250.0));

    assert!(panel.start_drag(p(30.0, 30.0), Some(DVec2::new(16.0, 16.0))));
    assert_eq!(panel.gesture(), Gesture::Dragging);
    assert!(panel.pointer_move(p(60.0, 430.0)));
    assert_eq!(panel.target(), DVec2::new(46.0, 416.0));

    // the rendered position trails the raw target
    let first = panel.tick(FrameTick { time: 1.0 / 60.0, delta: 1.0 / 60.0 });
    assert!(first.x > 16.0 && first.x < 46.0);
    assert!(first.y > 16.0 && first.y < 416.0);

    let edge = panel.pointer_up(Some(DVec2::new(1000.0, 800.0)));
    assert_eq!(edge, Some(Edge::Left));
    assert_eq!(panel.target(), DVec2::new(16.0, 416.0));
    assert_eq!(panel.gesture(), Gesture::Idle);

    let settled = panel.tick(FrameTick { time: 3.0, delta: 0.0 });
    assert_eq!(settled, DVec2::new(16.0, 416.0));
}

#[test]
fn drag_without_measurement_is_ignored() {
    let mut panel = DraggableContainer::new(PanelConfig::default());
    assert!(!panel.start_drag(p(10.0, 10.0), None));
    assert!(!panel.pointer_move(p(200.0, 200.0)));
    assert_eq!(panel.target(), DVec2::new(16.0, 16.0));
    assert_eq!(panel.pointer_up(Some(DVec2::new(1000.0, 800.0))), None);
}

#[test]
fn release_without_viewport_does_not_snap() {
    let mut panel = DraggableContainer::new(PanelConfig::default());
    panel.start_drag(p(0.0, 0.0), Some(DVec2::new(16.0, 16.0)));
    panel.pointer_move(p(100.0, 100.0));
    assert_eq!(panel.pointer_up(None), None);
    assert_eq!(panel.target(), DVec2::new(116.0, 116.0));
}

#[test]
fn resize_is_a_separate_gesture() {
    let mut panel = DraggableContainer::new(PanelConfig {
        aspect_ratio: Some(2.0),
        max_width: Some(500.0),
        width: 200.0,
        height: 100.0,
        ..PanelConfig::default()
    });
    assert!(panel.start_resize(p(216.0, 116.0)));
    assert_eq!(panel.gesture(), Gesture::Resizing);
    // a drag cannot start mid-resize
    assert!(!panel.start_drag(p(0.0, 0.0), Some(DVec2::ZERO)));

    panel.pointer_move(p(316.0, 400.0));
    assert_eq!(panel.size(), DVec2::new(300.0, 150.0));
    panel.pointer_move(p(916.0, 400.0));
    assert_eq!(panel.size(), DVec2::new(500.0, 250.0));

    assert_eq!(panel.pointer_up(Some(DVec2::new(1000.0, 800.0))), None);
    assert_eq!(panel.gesture(), Gesture::Idle);
    assert_eq!(panel.target(), DVec2::new(16.0, 16.0));
}

#[test]
fn height_follows_content_without_aspect() {
    let mut panel = DraggableContainer::new(PanelConfig::default());
    assert!(panel.auto_height());
    assert!(panel.sync_measured_height(312.0));
    assert!(!panel.sync_measured_height(312.0));
    assert_eq!(panel.size().y, 312.0);

    let mut fixed = DraggableContainer::new(PanelConfig {
        aspect_ratio: Some(1.0),
        ..PanelConfig::default()
    });
    assert!(!fixed.sync_measured_height(312.0));
}

fn clip_move(dx: f64, prev: ClipOffsets) -> DragMove<ClipOffsets> {
    DragMove { dx, dy: 0.0, prev }
}

#[test]
fn clip_handles_move_and_clamp() {
    let duration = 60.0;
    let width = 600.0; // 0.1 s per pixel
    let prev = ClipOffsets::new(10.0, 20.0);

    let start = drag_clip(ClipHandle::Start, &clip_move(50.0, prev), duration, width).expect("start");
    assert_eq!(start, ClipOffsets::new(15.0, 20.0));

    let start = drag_clip(ClipHandle::Start, &clip_move(900.0, prev), duration, width).expect("start");
    assert_eq!(start, ClipOffsets::new(40.0, 20.0));
    assert_eq!(start.len(duration), 0.0);

    let end = drag_clip(ClipHandle::End, &clip_move(-100.0, prev), duration, width).expect("end");
    assert_eq!(end, ClipOffsets::new(10.0, 30.0));
    assert_eq!(end.end_time(duration), 30.0);

    let end = drag_clip(ClipHandle::End, &clip_move(400.0, prev), duration, width).expect("end");
    assert_eq!(end.offset_end, 0.0);
}

#[test]
fn clip_window_keeps_its_length() {
    let duration = 60.0;
    let prev = ClipOffsets::new(10.0, 20.0);
    let moved = drag_clip(ClipHandle::Window, &clip_move(50.0, prev), duration, 600.0).expect("window");
    assert_eq!(moved, ClipOffsets::new(15.0, 15.0));

    let pinned = drag_clip(ClipHandle::Window, &clip_move(-5000.0, prev), duration, 600.0).expect("window");
    assert_eq!(pinned, ClipOffsets::new(0.0, 30.0));
    assert_eq!(pinned.len(duration), prev.len(duration));
}

#[test]
fn clip_needs_a_measured_chart() {
    let prev = ClipOffsets::default();
    assert!(drag_clip(ClipHandle::Start, &clip_move(10.0, prev), 60.0, 0.0).is_none());
}

#[test]
fn bar_count_follows_device_pixels() {
    assert_eq!(bar_count(300.0, 1.0), 100);
    assert_eq!(bar_count(300.0, 2.0), 200);
    assert_eq!(bar_count(2.0, 1.0), 0);
}
