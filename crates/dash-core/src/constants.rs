// Shared tuning constants for the dashboard engine. Runtime-tunable values
// are mirrored in `config.rs`; these are their defaults.

// Spring integration
pub const SPRING_EPSILON: f64 = 0.001; // settle threshold for |displacement| and |velocity|
pub const DEFAULT_SPRING_DAMPING: f64 = 1.0; // critically damped
pub const DEFAULT_SPRING_SPEED: f64 = 10.0; // angular speed (rad/s)
pub const HARD_CUT_SPEED: f64 = 1e100; // effectively instant arrival

// Live status
pub const STATUS_POLL_INTERVAL_MS: u32 = 2_500;
pub const STATUS_RECONNECT_DELAY_MS: u32 = 3_000;
pub const STATUS_PATH: &str = "/api/status";
pub const STATUS_WS_PATH: &str = "/api/status/ws";

// History pages
pub const HISTORY_PATH: &str = "/api/history";
pub const HISTORY_FIRST_PAGE: u32 = 1;

// Predictive scroll loading (milliseconds)
pub const SCROLL_LEAD_MARGIN_MS: f64 = 500.0; // added to each measured fetch time
pub const SCROLL_INITIAL_FETCH_MS: f64 = 500.0; // lead window before the first fetch completes

// Pointer dragging
pub const DRAG_PRECISION_FACTOR: f64 = 3.0; // delta divisor while Ctrl/Meta is held

// Floating panel
pub const PANEL_SNAP_OFFSET: f64 = 16.0; // px gap kept from the snapped edge
pub const PANEL_DRAG_SPEED: f64 = 60.0; // follow spring speed
pub const PANEL_DEFAULT_WIDTH: f64 = 250.0;
pub const PANEL_DEFAULT_HEIGHT: f64 = 250.0;

// Delayed values
pub const CHART_WIDTH_SETTLE_MS: f64 = 500.0;
