//! Frame-driven debounce: publishes a value once it has stopped changing for
//! a while.

#[derive(Clone, Debug)]
pub struct DelayedValue<T> {
    pending: T,
    published: T,
    last_change_ms: f64,
    delay_ms: f64,
}

impl<T: Clone + PartialEq> DelayedValue<T> {
    pub fn new(value: T, delay_ms: f64) -> Self {
        Self {
            pending: value.clone(),
            published: value,
            last_change_ms: f64::NEG_INFINITY,
            delay_ms,
        }
    }

    /// Record the latest input. Only an actual change restarts the delay.
    pub fn set(&mut self, value: T, now_ms: f64) {
        if value != self.pending {
            self.pending = value;
            self.last_change_ms = now_ms;
        }
    }

    /// Call once per frame. Returns `true` when a new value was published.
    pub fn update(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_change_ms >= self.delay_ms && self.published != self.pending {
            self.published = self.pending.clone();
            return true;
        }
        false
    }

    pub fn value(&self) -> &T {
        &self.published
    }

    pub fn pending(&self) -> &T {
        &self.pending
    }
}
