//! Cooperative per-frame scheduler.
//!
//! A `FrameClock` owns an ordered list of consumers. A repaint driver (the
//! browser's `requestAnimationFrame` in `dash-web`, a test loop on the host)
//! calls [`FrameClock::run_frame`] once per repaint; every live consumer is
//! invoked once, in registration order, with its own [`FrameTick`].
//!
//! Registrations are RAII: [`FrameClock::subscribe`] hands back a
//! [`FrameSubscription`] which cancels on drop. Cancelling is idempotent and
//! may happen from inside the consumer's own callback.
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// One repaint as seen by one consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTick {
    /// Seconds since this consumer's first tick.
    pub time: f64,
    /// Seconds since this consumer's previous tick (0 on the first tick).
    pub delta: f64,
}

type FrameCallback = Box<dyn FnMut(FrameTick)>;

struct Slot {
    id: u64,
    active: Rc<Cell<bool>>,
    origin_ms: Cell<Option<f64>>,
    last_ms: Cell<f64>,
    callback: RefCell<FrameCallback>,
}

impl Slot {
    fn tick_at(&self, now_ms: f64) -> FrameTick {
        let origin = match self.origin_ms.get() {
            Some(o) => o,
            None => {
                self.origin_ms.set(Some(now_ms));
                self.last_ms.set(now_ms);
                now_ms
            }
        };
        let delta_ms = (now_ms - self.last_ms.get()).max(0.0);
        self.last_ms.set(now_ms);
        FrameTick {
            time: (now_ms - origin) / 1000.0,
            delta: delta_ms / 1000.0,
        }
    }
}

struct ClockInner {
    attached: bool,
    slots: RefCell<Vec<Rc<Slot>>>,
    next_id: Cell<u64>,
    running: Cell<bool>,
    last_frame_ms: Cell<Option<f64>>,
    waker: RefCell<Option<Rc<dyn Fn()>>>,
}

impl ClockInner {
    fn remove(&self, id: u64) {
        self.slots.borrow_mut().retain(|s| s.id != id);
    }
}

/// Cheaply cloneable handle to a frame scheduler.
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<ClockInner>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameClock")
            .field("attached", &self.inner.attached)
            .field("consumers", &self.len())
            .finish()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_attached(true)
    }

    /// A clock with no repaint signal behind it. Subscribing is a no-op and
    /// callbacks never fire.
    pub fn detached() -> Self {
        Self::with_attached(false)
    }

    fn with_attached(attached: bool) -> Self {
        Self {
            inner: Rc::new(ClockInner {
                attached,
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                running: Cell::new(false),
                last_frame_ms: Cell::new(None),
                waker: RefCell::new(None),
            }),
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.inner.attached
    }

    /// Number of live consumers.
    pub fn len(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hook invoked after every successful subscription; the repaint driver
    /// uses it to resume requesting frames once it has gone idle.
    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        *self.inner.waker.borrow_mut() = Some(Rc::new(waker));
    }

    pub fn subscribe(&self, callback: impl FnMut(FrameTick) + 'static) -> FrameSubscription {
        if !self.inner.attached {
            log::debug!("[frame] no repaint signal; subscription is inert");
            return FrameSubscription::inert();
        }
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let active = Rc::new(Cell::new(true));
        self.inner.slots.borrow_mut().push(Rc::new(Slot {
            id,
            active: active.clone(),
            origin_ms: Cell::new(None),
            last_ms: Cell::new(0.0),
            callback: RefCell::new(Box::new(callback)),
        }));
        let waker = self.inner.waker.borrow().clone();
        if let Some(wake) = waker {
            wake();
        }
        FrameSubscription {
            id,
            active,
            clock: Rc::downgrade(&self.inner),
        }
    }

    /// Run one cooperative pass. `timestamp_ms` is the repaint timestamp
    /// (`DOMHighResTimeStamp` in the browser); it is clamped to be monotonic.
    ///
    /// Consumers added during the pass first run on the next pass; consumers
    /// cancelled during the pass are skipped. Nested calls are ignored.
    pub fn run_frame(&self, timestamp_ms: f64) {
        if self.inner.running.get() {
            log::debug!("[frame] nested run_frame ignored");
            return;
        }
        let now_ms = match self.inner.last_frame_ms.get() {
            Some(prev) if timestamp_ms < prev => prev,
            _ => timestamp_ms,
        };
        self.inner.last_frame_ms.set(Some(now_ms));

        let snapshot: SmallVec<[Rc<Slot>; 8]> =
            self.inner.slots.borrow().iter().cloned().collect();
        self.inner.running.set(true);
        for slot in snapshot {
            if !slot.active.get() {
                continue;
            }
            let tick = slot.tick_at(now_ms);
            match slot.callback.try_borrow_mut() {
                Ok(mut cb) => (*cb)(tick),
                Err(_) => log::warn!("[frame] consumer {} re-entered; skipped", slot.id),
            }
        }
        self.inner.running.set(false);
    }
}

/// Disposer token for one frame registration. Dropping it cancels.
#[must_use = "dropping a FrameSubscription cancels it immediately"]
pub struct FrameSubscription {
    id: u64,
    active: Rc<Cell<bool>>,
    clock: Weak<ClockInner>,
}

impl fmt::Debug for FrameSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSubscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

impl FrameSubscription {
    /// A token that was never registered (detached clock).
    pub fn inert() -> Self {
        Self {
            id: 0,
            active: Rc::new(Cell::new(false)),
            clock: Weak::new(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stop further invocations. Safe to call repeatedly and from inside the
    /// consumer's own callback.
    pub fn cancel(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(inner) = self.clock.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
