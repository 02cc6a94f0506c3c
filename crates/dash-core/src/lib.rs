//! Reactive UI engine for the pidentify dashboard.
//!
//! Everything here is platform-agnostic and single-threaded; `dash-web` binds
//! it to `requestAnimationFrame`, `WebSocket`, `fetch` and DOM pointer events.
pub mod clip;
pub mod config;
pub mod constants;
pub mod delayed;
pub mod drag;
pub mod error;
pub mod frame;
pub mod history;
pub mod oscillator;
pub mod panel;
pub mod scroll;
pub mod spring;
pub mod status;
pub mod sync;

pub use clip::{drag_clip, ClipHandle, ClipOffsets};
pub use config::DashboardConfig;
pub use delayed::DelayedValue;
pub use drag::{drag_transition, DragEffect, DragEvent, DragMove, DragState, DragTracker, PointerSample};
pub use error::{ConfigError, FetchError, StatusError};
pub use frame::{FrameClock, FrameSubscription, FrameTick};
pub use history::{HistoryEntry, HistoryPage, HistoryPager};
pub use oscillator::{spring_coefficients, Transition};
pub use panel::{nearest_edge, resize_with_aspect, snap_to_edge, DraggableContainer, Edge, Gesture};
pub use scroll::{ScrollMetrics, ScrollPredictor, ScrollSample};
pub use spring::{SpringHandle, SpringValue, SpringVec2};
pub use status::Status;
pub use sync::{resolve_authoritative, Authoritative, ChannelState, SocketState, StatusSynchronizer};
