//! Floating, draggable, resizable panel with edge snapping.
//!
//! The raw drag position is the spring goal; what gets rendered is the
//! spring's output, so the panel trails the pointer with a little inertia and
//! glides into place when it snaps.
use crate::config::PanelConfig;
use crate::drag::{DragTracker, PointerSample};
use crate::frame::FrameTick;
use crate::spring::SpringVec2;
use glam::DVec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging,
    Resizing,
}

/// Nearest viewport edge and its distance. Ties go to the earlier of
/// left, right, top, bottom.
pub fn nearest_edge(position: DVec2, size: DVec2, viewport: DVec2) -> (Edge, f64) {
    let candidates = [
        (Edge::Left, position.x),
        (Edge::Right, viewport.x - (position.x + size.x)),
        (Edge::Top, position.y),
        (Edge::Bottom, viewport.y - (position.y + size.y)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.1 < best.1 {
            best = *c;
        }
    }
    best
}

/// Where the panel should rest after a drag, or `None` if no edge is within
/// `threshold`. Only the axis of the chosen edge moves.
pub fn snap_to_edge(
    position: DVec2,
    size: DVec2,
    viewport: DVec2,
    snap_offset: f64,
    threshold: f64,
) -> Option<(Edge, DVec2)> {
    let (edge, distance) = nearest_edge(position, size, viewport);
    if !(distance < threshold) {
        return None;
    }
    let snapped = match edge {
        Edge::Left => DVec2::new(snap_offset, position.y),
        Edge::Right => DVec2::new(viewport.x - size.x - snap_offset, position.y),
        Edge::Top => DVec2::new(position.x, snap_offset),
        Edge::Bottom => DVec2::new(position.x, viewport.y - size.y - snap_offset),
    };
    Some((edge, snapped))
}

/// Clamp a requested size to the configured maxima and, with a fixed aspect
/// ratio (`width / height`), derive the secondary dimension. Landscape ratios
/// follow width, portrait ratios follow height.
pub fn resize_with_aspect(
    requested: DVec2,
    aspect_ratio: Option<f64>,
    max_width: Option<f64>,
    max_height: Option<f64>,
) -> DVec2 {
    let mut width = requested.x.max(0.0);
    let mut height = requested.y.max(0.0);
    if let Some(m) = max_width {
        width = width.min(m);
    }
    if let Some(m) = max_height {
        height = height.min(m);
    }
    match aspect_ratio {
        Some(r) if r >= 1.0 => DVec2::new(width, width / r),
        Some(r) if r > 0.0 => DVec2::new(height * r, height),
        _ => DVec2::new(width, height),
    }
}

#[derive(Clone, Debug)]
pub struct DraggableContainer {
    config: PanelConfig,
    target: DVec2,
    size: DVec2,
    springs: SpringVec2,
    drag: DragTracker<DVec2>,
    resize: DragTracker<DVec2>,
    last_snap: Option<Edge>,
}

impl DraggableContainer {
    pub fn new(config: PanelConfig) -> Self {
        let target = DVec2::splat(config.snap_offset);
        let size = resize_with_aspect(
            DVec2::new(config.width, config.height),
            config.aspect_ratio,
            config.max_width,
            config.max_height,
        );
        Self {
            springs: SpringVec2::new(target, 1.0, config.drag_speed, 0.0),
            drag: DragTracker::with_precision_factor(1.0),
            resize: DragTracker::with_precision_factor(1.0),
            config,
            target,
            size,
            last_snap: None,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn gesture(&self) -> Gesture {
        if self.drag.is_dragging() {
            Gesture::Dragging
        } else if self.resize.is_dragging() {
            Gesture::Resizing
        } else {
            Gesture::Idle
        }
    }

    /// Raw (unanimated) position.
    pub fn target(&self) -> DVec2 {
        self.target
    }

    /// Animated position to write to the DOM.
    pub fn render_position(&self) -> DVec2 {
        self.springs.value()
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn last_snap(&self) -> Option<Edge> {
        self.last_snap
    }

    /// True when the height is driven by content rather than the panel.
    pub fn auto_height(&self) -> bool {
        self.config.aspect_ratio.is_none()
    }

    /// Begin moving the panel. `measured_origin` is the element's current
    /// on-screen top-left; without it the gesture is not started.
    pub fn start_drag(&mut self, pointer: PointerSample, measured_origin: Option<DVec2>) -> bool {
        if self.resize.is_dragging() {
            return false;
        }
        let Some(origin) = measured_origin else {
            log::debug!("[panel] drag before the panel was measured; ignored");
            return false;
        };
        self.drag.pointer_down(pointer, origin)
    }

    pub fn start_resize(&mut self, pointer: PointerSample) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        self.resize.pointer_down(pointer, self.size)
    }

    /// Returns `true` if the target position or size changed.
    pub fn pointer_move(&mut self, pointer: PointerSample) -> bool {
        if let Some(mv) = self.drag.pointer_move(pointer) {
            self.target = mv.prev + mv.delta();
            self.springs.set_goal(self.target);
            return true;
        }
        if let Some(mv) = self.resize.pointer_move(pointer) {
            self.size = resize_with_aspect(
                mv.prev + mv.delta(),
                self.config.aspect_ratio,
                self.config.max_width,
                self.config.max_height,
            );
            return true;
        }
        false
    }

    /// End whichever gesture is active. A finished drag snaps to the nearest
    /// edge of `viewport` when one is known.
    pub fn pointer_up(&mut self, viewport: Option<DVec2>) -> Option<Edge> {
        if self.drag.pointer_up().is_some() {
            let vp = viewport?;
            let (edge, snapped) = snap_to_edge(
                self.target,
                self.size,
                vp,
                self.config.snap_offset,
                self.config.snap_threshold(),
            )?;
            log::debug!("[panel] snap {:?} -> ({:.0}, {:.0})", edge, snapped.x, snapped.y);
            self.target = snapped;
            self.springs.set_goal(snapped);
            self.last_snap = Some(edge);
            return Some(edge);
        }
        _ = self.resize.pointer_up();
        None
    }

    /// Follow the content height when no aspect ratio pins it.
    pub fn sync_measured_height(&mut self, client_height: f64) -> bool {
        if self.auto_height() && client_height != self.size.y {
            self.size.y = client_height;
            return true;
        }
        false
    }

    /// Advance the follow springs; returns the position to render.
    pub fn tick(&mut self, tick: FrameTick) -> DVec2 {
        self.springs.update(tick.time)
    }
}
