//! Dashboard configuration.
//!
//! Every section falls back to the defaults in `constants.rs`, so an override
//! document only needs the keys it changes:
//!
//! ```json
//! { "scroll": { "lead_margin_ms": 750 }, "panel": { "snap_threshold": 120 } }
//! ```
use crate::constants::*;
use crate::error::ConfigError;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub status: StatusConfig,
    pub scroll: ScrollConfig,
    pub spring: SpringConfig,
    pub drag: DragConfig,
    pub panel: PanelConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatusConfig {
    pub poll_interval_ms: u32,
    pub reconnect_delay_ms: u32,
    pub status_path: String,
    pub ws_path: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: STATUS_POLL_INTERVAL_MS,
            reconnect_delay_ms: STATUS_RECONNECT_DELAY_MS,
            status_path: STATUS_PATH.to_string(),
            ws_path: STATUS_WS_PATH.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    /// Added to each measured fetch time to size the next lead window.
    pub lead_margin_ms: f64,
    /// Lead window used until the first fetch completes.
    pub initial_fetch_ms: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lead_margin_ms: SCROLL_LEAD_MARGIN_MS,
            initial_fetch_ms: SCROLL_INITIAL_FETCH_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpringConfig {
    pub damping: f64,
    pub speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_SPRING_DAMPING,
            speed: DEFAULT_SPRING_SPEED,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    pub precision_factor: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            precision_factor: DRAG_PRECISION_FACTOR,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PanelConfig {
    pub snap_offset: f64,
    /// `None` snaps on every release.
    pub snap_threshold: Option<f64>,
    pub drag_speed: f64,
    pub aspect_ratio: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub width: f64,
    pub height: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            snap_offset: PANEL_SNAP_OFFSET,
            snap_threshold: None,
            drag_speed: PANEL_DRAG_SPEED,
            aspect_ratio: None,
            max_width: None,
            max_height: None,
            width: PANEL_DEFAULT_WIDTH,
            height: PANEL_DEFAULT_HEIGHT,
        }
    }
}

impl PanelConfig {
    #[inline]
    pub fn snap_threshold(&self) -> f64 {
        self.snap_threshold.unwrap_or(f64::INFINITY)
    }
}

impl DashboardConfig {
    /// Parse an override document and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: DashboardConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidParameter(
                "status.poll_interval_ms must be > 0".into(),
            ));
        }
        if !(self.scroll.lead_margin_ms >= 0.0) || !(self.scroll.initial_fetch_ms >= 0.0) {
            return Err(ConfigError::InvalidParameter(
                "scroll lead windows must be >= 0".into(),
            ));
        }
        if !(self.spring.damping >= 0.0) || !(self.spring.speed >= 0.0) {
            return Err(ConfigError::InvalidParameter(
                "spring damping and speed must be >= 0".into(),
            ));
        }
        if !(self.drag.precision_factor >= 1.0) {
            return Err(ConfigError::InvalidParameter(
                "drag.precision_factor must be >= 1".into(),
            ));
        }
        if !(self.panel.drag_speed >= 0.0) {
            return Err(ConfigError::InvalidParameter(
                "panel.drag_speed must be >= 0".into(),
            ));
        }
        if let Some(ratio) = self.panel.aspect_ratio {
            if !(ratio > 0.0) {
                return Err(ConfigError::InvalidParameter(
                    "panel.aspect_ratio must be > 0".into(),
                ));
            }
        }
        Ok(())
    }
}
