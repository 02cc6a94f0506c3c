use crate::dom;
use crate::events::pointer::{pointer_sample, Listener};
use crate::frame;
use dash_core::config::PanelConfig;
use dash_core::frame::FrameSubscription;
use dash_core::panel::{DraggableContainer, Gesture};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// A mounted floating panel. Dropping it stops the animation and removes
/// its listeners; the element keeps its last position.
pub struct DraggablePanel {
    container: Rc<RefCell<DraggableContainer>>,
    _frame: FrameSubscription,
    _listeners: Vec<Listener>,
}

impl DraggablePanel {
    pub fn gesture(&self) -> Gesture {
        self.container.borrow().gesture()
    }
}

/// Make `element` a fixed, draggable panel. `resize_handle`, when given, is
/// a child that resizes instead of moving.
pub fn mount_draggable(
    element: web::HtmlElement,
    resize_handle: Option<web::Element>,
    config: PanelConfig,
) -> anyhow::Result<DraggablePanel> {
    let container = Rc::new(RefCell::new(DraggableContainer::new(config)));
    dom::set_style(&element, "position", "fixed");
    dom::set_style(&element, "user-select", "none");
    dom::set_style(&element, "touch-action", "none");

    let mut listeners = Vec::with_capacity(4);
    if let Some(handle) = resize_handle {
        let container = container.clone();
        listeners.push(Listener::new(&handle, "pointerdown", move |ev: web::PointerEvent| {
            // keep the press from also starting a move on the panel
            ev.stop_propagation();
            ev.prevent_default();
            container.borrow_mut().start_resize(pointer_sample(&ev));
        })?);
    }
    {
        let container = container.clone();
        let el = element.clone();
        listeners.push(Listener::new(&element, "pointerdown", move |ev: web::PointerEvent| {
            let started = container
                .borrow_mut()
                .start_drag(pointer_sample(&ev), dom::client_origin(&el));
            if started {
                ev.prevent_default();
            }
        })?);
    }
    {
        let container = container.clone();
        listeners.push(Listener::window("pointermove", move |ev: web::PointerEvent| {
            container.borrow_mut().pointer_move(pointer_sample(&ev));
        })?);
    }
    {
        let container = container.clone();
        listeners.push(Listener::window("pointerup", move |_ev: web::PointerEvent| {
            if let Some(edge) = container.borrow_mut().pointer_up(dom::viewport_size()) {
                log::debug!("[drag] panel snapped {:?}", edge);
            }
        })?);
    }

    let frame = {
        let container = container.clone();
        let el = element.clone();
        frame::subscribe_frame(move |tick| {
            let mut c = container.borrow_mut();
            if c.auto_height() && el.is_connected() {
                c.sync_measured_height(el.client_height() as f64);
            }
            let pos = c.tick(tick);
            let size = c.size();
            dom::set_px(&el, "left", pos.x);
            dom::set_px(&el, "top", pos.y);
            dom::set_px(&el, "width", size.x);
            if c.auto_height() {
                dom::set_style(&el, "height", "auto");
            } else {
                dom::set_px(&el, "height", size.y);
            }
            let cursor = match c.gesture() {
                Gesture::Dragging => "grabbing",
                _ => "grab",
            };
            dom::set_style(&el, "cursor", cursor);
        })
    };

    Ok(DraggablePanel {
        container,
        _frame: frame,
        _listeners: listeners,
    })
}
