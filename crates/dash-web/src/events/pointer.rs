use dash_core::config::DragConfig;
use dash_core::drag::{DragMove, DragTracker, PointerSample};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn pointer_sample(ev: &web::PointerEvent) -> PointerSample {
    PointerSample::new(ev.client_x() as f64, ev.client_y() as f64)
        .with_precision(ev.ctrl_key() || ev.meta_key())
}

/// A pointer event listener that unregisters itself on drop.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::PointerEvent)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::PointerEvent) + 'static,
    ) -> anyhow::Result<Listener> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Listener {
            target: target.clone(),
            kind,
            closure,
        })
    }

    /// `pointermove` and `pointerup` on the window, so a drag keeps tracking
    /// when the pointer leaves the element.
    pub fn window(
        kind: &'static str,
        handler: impl FnMut(web::PointerEvent) + 'static,
    ) -> anyhow::Result<Listener> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        Listener::new(&window, kind, handler)
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Callbacks for [`use_drag`]. `base` snapshots the value being dragged when
/// the pointer goes down; returning `None` ignores the press.
pub struct DragHandlers<T> {
    pub base: Box<dyn Fn() -> Option<T>>,
    pub on_move: Box<dyn FnMut(DragMove<T>)>,
    pub on_end: Box<dyn FnMut()>,
}

/// Live drag wiring for one element. Dropping it removes every listener.
pub struct DragBinding<T> {
    tracker: Rc<RefCell<DragTracker<T>>>,
    _listeners: Vec<Listener>,
}

impl<T> DragBinding<T> {
    pub fn dragging(&self) -> bool
    where
        T: Clone,
    {
        self.tracker.borrow().is_dragging()
    }
}

/// Track pointer drags that start on `element`. Deltas are divided by
/// `config.precision_factor` while Ctrl/Meta is held.
pub fn use_drag<T: Clone + 'static>(
    element: &web::Element,
    handlers: DragHandlers<T>,
    config: &DragConfig,
) -> anyhow::Result<DragBinding<T>> {
    let tracker = Rc::new(RefCell::new(DragTracker::from_config(config)));
    let DragHandlers {
        base,
        mut on_move,
        mut on_end,
    } = handlers;

    let down = {
        let tracker = tracker.clone();
        Listener::new(element, "pointerdown", move |ev: web::PointerEvent| {
            let Some(value) = base() else {
                log::debug!("[drag] no base value yet; press ignored");
                return;
            };
            if tracker.borrow_mut().pointer_down(pointer_sample(&ev), value) {
                ev.stop_propagation();
                ev.prevent_default();
            }
        })?
    };
    let moved = {
        let tracker = tracker.clone();
        Listener::window("pointermove", move |ev: web::PointerEvent| {
            let mv = tracker.borrow_mut().pointer_move(pointer_sample(&ev));
            if let Some(mv) = mv {
                on_move(mv);
            }
        })?
    };
    let up = {
        let tracker = tracker.clone();
        Listener::window("pointerup", move |_ev: web::PointerEvent| {
            let ended = tracker.borrow_mut().pointer_up();
            if ended.is_some() {
                on_end();
            }
        })?
    };

    Ok(DragBinding {
        tracker,
        _listeners: vec![down, moved, up],
    })
}
