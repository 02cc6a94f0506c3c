//! Pointer drag tracking as an explicit state machine.
//!
//! `Idle -> Dragging(session) -> Idle`. The session snapshots where the
//! pointer went down and the value being dragged at that moment; every move
//! reports deltas relative to that origin together with the snapshot.
use crate::config::DragConfig;
use crate::constants::DRAG_PRECISION_FACTOR;
use glam::DVec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Precision modifier held (Ctrl/Meta).
    pub precision: bool,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            precision: false,
        }
    }

    pub fn with_precision(mut self, precision: bool) -> Self {
        self.precision = precision;
        self
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession<T> {
    pub origin: DVec2,
    pub base: T,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState<T> {
    #[default]
    Idle,
    Dragging(DragSession<T>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragEvent<T> {
    Down { pointer: PointerSample, base: T },
    Move(PointerSample),
    Up,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragMove<T> {
    pub dx: f64,
    pub dy: f64,
    pub prev: T,
}

impl<T> DragMove<T> {
    #[inline]
    pub fn delta(&self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragEffect<T> {
    None,
    Started,
    Moved(DragMove<T>),
    Ended(DragSession<T>),
}

/// Pure transition. A second pointer-down while dragging is ignored, as are
/// moves and ups while idle.
pub fn drag_transition<T: Clone>(
    state: DragState<T>,
    event: DragEvent<T>,
    precision_factor: f64,
) -> (DragState<T>, DragEffect<T>) {
    match (state, event) {
        (DragState::Idle, DragEvent::Down { pointer, base }) => (
            DragState::Dragging(DragSession {
                origin: pointer.position(),
                base,
            }),
            DragEffect::Started,
        ),
        (DragState::Dragging(session), DragEvent::Move(pointer)) => {
            let factor = if pointer.precision {
                precision_factor.max(1.0)
            } else {
                1.0
            };
            let mv = DragMove {
                dx: (pointer.x - session.origin.x) / factor,
                dy: (pointer.y - session.origin.y) / factor,
                prev: session.base.clone(),
            };
            (DragState::Dragging(session), DragEffect::Moved(mv))
        }
        (DragState::Dragging(session), DragEvent::Up) => {
            (DragState::Idle, DragEffect::Ended(session))
        }
        (state, _) => (state, DragEffect::None),
    }
}

/// Owns one drag state machine. One session at a time.
#[derive(Clone, Debug)]
pub struct DragTracker<T> {
    state: DragState<T>,
    precision_factor: f64,
}

impl<T: Clone> Default for DragTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> DragTracker<T> {
    pub fn new() -> Self {
        Self::with_precision_factor(DRAG_PRECISION_FACTOR)
    }

    pub fn from_config(config: &DragConfig) -> Self {
        Self::with_precision_factor(config.precision_factor)
    }

    /// `1.0` disables precision scaling.
    pub fn with_precision_factor(precision_factor: f64) -> Self {
        Self {
            state: DragState::Idle,
            precision_factor,
        }
    }

    pub fn state(&self) -> &DragState<T> {
        &self.state
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    fn step(&mut self, event: DragEvent<T>) -> DragEffect<T> {
        let state = std::mem::take(&mut self.state);
        let (next, effect) = drag_transition(state, event, self.precision_factor);
        self.state = next;
        effect
    }

    /// Returns `false` if a session was already active.
    pub fn pointer_down(&mut self, pointer: PointerSample, base: T) -> bool {
        matches!(
            self.step(DragEvent::Down { pointer, base }),
            DragEffect::Started
        )
    }

    pub fn pointer_move(&mut self, pointer: PointerSample) -> Option<DragMove<T>> {
        match self.step(DragEvent::Move(pointer)) {
            DragEffect::Moved(mv) => Some(mv),
            _ => None,
        }
    }

    /// Ends the session, returning it if one was active.
    pub fn pointer_up(&mut self) -> Option<DragSession<T>> {
        match self.step(DragEvent::Up) {
            DragEffect::Ended(session) => Some(session),
            _ => None,
        }
    }
}
