//! `requestAnimationFrame` driver for the process-wide frame clock.
//!
//! Frames are requested only while at least one consumer is subscribed. The
//! clock's waker restarts the loop when a subscription arrives after it went
//! idle.
use dash_core::frame::{FrameClock, FrameSubscription, FrameTick};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Driver {
    clock: FrameClock,
    scheduled: Cell<bool>,
    tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

thread_local! {
    static DRIVER: Option<Rc<Driver>> = Driver::install();
}

impl Driver {
    fn install() -> Option<Rc<Driver>> {
        if web::window().is_none() {
            log::info!("[frame] no window; frame consumers will never run");
            return None;
        }
        let driver = Rc::new(Driver {
            clock: FrameClock::new(),
            scheduled: Cell::new(false),
            tick: RefCell::new(None),
        });

        let weak: Weak<Driver> = Rc::downgrade(&driver);
        *driver.tick.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            if let Some(d) = weak.upgrade() {
                d.on_frame(ts);
            }
        }) as Box<dyn FnMut(f64)>));

        let weak = Rc::downgrade(&driver);
        driver.clock.set_waker(move || {
            if let Some(d) = weak.upgrade() {
                d.request();
            }
        });
        Some(driver)
    }

    fn request(&self) {
        if self.scheduled.replace(true) {
            return;
        }
        let requested = match (web::window(), self.tick.borrow().as_ref()) {
            (Some(w), Some(cb)) => w.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok(),
            _ => false,
        };
        if !requested {
            log::warn!("[frame] requestAnimationFrame failed");
            self.scheduled.set(false);
        }
    }

    fn on_frame(&self, timestamp_ms: f64) {
        self.scheduled.set(false);
        self.clock.run_frame(timestamp_ms);
        if !self.clock.is_empty() {
            self.request();
        }
    }
}

/// The shared clock; detached when there is no window.
pub fn clock() -> FrameClock {
    DRIVER.with(|d| match d {
        Some(d) => d.clock.clone(),
        None => FrameClock::detached(),
    })
}

/// Run `callback` on every repaint until the returned token is dropped.
pub fn subscribe_frame(callback: impl FnMut(FrameTick) + 'static) -> FrameSubscription {
    clock().subscribe(callback)
}
