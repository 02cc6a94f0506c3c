use crate::frame;
use dash_core::spring::SpringHandle;

/// A spring advanced by the shared frame clock. Use
/// [`SpringHandle::hard_cut`] to restart it without animating.
pub fn use_spring_value(goal: f64, damping: f64, speed: f64) -> SpringHandle {
    SpringHandle::attach(&frame::clock(), goal, damping, speed)
}
