// Host-side tests for configuration, constants and the delayed value.

use dash_core::config::DashboardConfig;
use dash_core::constants::*;
use dash_core::delayed::DelayedValue;
use dash_core::error::ConfigError;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(SPRING_EPSILON > 0.0 && SPRING_EPSILON < 0.01);
    assert!(STATUS_POLL_INTERVAL_MS > 0);
    assert!(STATUS_RECONNECT_DELAY_MS > 0);
    assert!(SCROLL_LEAD_MARGIN_MS >= 0.0);
    assert!(DRAG_PRECISION_FACTOR >= 1.0);
    assert!(PANEL_SNAP_OFFSET >= 0.0);
    assert!(STATUS_WS_PATH.starts_with(STATUS_PATH));
}

#[test]
fn defaults_match_constants() {
    let cfg = DashboardConfig::default();
    assert_eq!(cfg.status.poll_interval_ms, STATUS_POLL_INTERVAL_MS);
    assert_eq!(cfg.status.ws_path, STATUS_WS_PATH);
    assert_eq!(cfg.scroll.lead_margin_ms, SCROLL_LEAD_MARGIN_MS);
    assert_eq!(cfg.scroll.initial_fetch_ms, SCROLL_INITIAL_FETCH_MS);
    assert_eq!(cfg.drag.precision_factor, DRAG_PRECISION_FACTOR);
    assert_eq!(cfg.panel.snap_threshold(), f64::INFINITY);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_override_keeps_other_defaults() {
    let cfg = DashboardConfig::from_json(
        r#"{ "scroll": { "lead_margin_ms": 250 }, "panel": { "snap_threshold": 120, "aspect_ratio": 1.5 } }"#,
    )
    .expect("valid override");
    assert_eq!(cfg.scroll.lead_margin_ms, 250.0);
    assert_eq!(cfg.scroll.initial_fetch_ms, SCROLL_INITIAL_FETCH_MS);
    assert_eq!(cfg.panel.snap_threshold(), 120.0);
    assert_eq!(cfg.panel.aspect_ratio, Some(1.5));
    assert_eq!(cfg.status.poll_interval_ms, STATUS_POLL_INTERVAL_MS);
}

#[test]
fn empty_object_is_all_defaults() {
    let cfg = DashboardConfig::from_json("{}").expect("empty override");
    assert_eq!(cfg, DashboardConfig::default());
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        r#"{ "status": { "poll_interval_ms": 0 } }"#,
        r#"{ "scroll": { "lead_margin_ms": -1 } }"#,
        r#"{ "spring": { "speed": -10 } }"#,
        r#"{ "drag": { "precision_factor": 0.5 } }"#,
        r#"{ "panel": { "aspect_ratio": 0 } }"#,
    ] {
        assert!(
            matches!(DashboardConfig::from_json(bad), Err(ConfigError::InvalidParameter(_))),
            "accepted {bad}"
        );
    }
    assert!(matches!(DashboardConfig::from_json("[1, 2"), Err(ConfigError::Json(_))));
}

#[test]
fn delayed_value_publishes_after_quiet_period() {
    let mut v = DelayedValue::new(100u32, 500.0);
    assert_eq!(*v.value(), 100);

    v.set(120, 1000.0);
    assert!(!v.update(1016.0));
    v.set(140, 1200.0);
    assert!(!v.update(1600.0));
    assert_eq!(*v.value(), 100);
    assert_eq!(*v.pending(), 140);

    assert!(v.update(1700.0));
    assert_eq!(*v.value(), 140);
    assert!(!v.update(1716.0));
}

#[test]
fn delayed_value_ignores_repeated_input() {
    let mut v = DelayedValue::new(1u32, 500.0);
    v.set(2, 0.0);
    // setting the same value again does not restart the delay
    v.set(2, 400.0);
    assert!(v.update(500.0));
    assert_eq!(*v.value(), 2);
}
