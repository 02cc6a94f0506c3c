//! Live status transport: status socket with reconnect, interval polling
//! while the socket is down, and a refetch whenever the window regains focus.
//! Both channels feed one `StatusSynchronizer`.
use crate::net;
use crate::url;
use dash_core::config::StatusConfig;
use dash_core::status::Status;
use dash_core::sync::{Authoritative, SocketState, StatusSynchronizer};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type Listener = Box<dyn Fn(&Authoritative)>;

struct Socket {
    ws: web::WebSocket,
    _on_open: Closure<dyn FnMut(web::Event)>,
    _on_message: Closure<dyn FnMut(web::MessageEvent)>,
    _on_close: Closure<dyn FnMut(web::CloseEvent)>,
    _on_error: Closure<dyn FnMut(web::Event)>,
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
        _ = self.ws.close();
    }
}

struct Inner {
    config: StatusConfig,
    sync: RefCell<StatusSynchronizer>,
    socket: RefCell<Option<Socket>>,
    generation: Cell<u64>,
    poll_timer: Cell<Option<i32>>,
    poll_tick: RefCell<Option<Closure<dyn FnMut()>>>,
    poll_in_flight: Cell<bool>,
    on_focus: RefCell<Option<Closure<dyn FnMut(web::FocusEvent)>>>,
    listeners: RefCell<Vec<Listener>>,
}

/// Handle to the running status feed. Dropping it closes the socket and
/// stops polling.
#[derive(Clone)]
pub struct LiveStatus {
    inner: Rc<Inner>,
}

impl LiveStatus {
    pub fn start(config: StatusConfig) -> anyhow::Result<LiveStatus> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let inner = Rc::new(Inner {
            sync: RefCell::new(StatusSynchronizer::new(config.poll_interval_ms)),
            config,
            socket: RefCell::new(None),
            generation: Cell::new(0),
            poll_timer: Cell::new(None),
            poll_tick: RefCell::new(None),
            poll_in_flight: Cell::new(false),
            on_focus: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        {
            let weak = Rc::downgrade(&inner);
            *inner.poll_tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    poll_now(&inner);
                }
            }) as Box<dyn FnMut()>));
        }
        {
            let weak = Rc::downgrade(&inner);
            let closure = Closure::wrap(Box::new(move |_ev: web::FocusEvent| {
                if let Some(inner) = weak.upgrade() {
                    if inner.sync.borrow().refetch_on_focus() {
                        log::debug!("[status] focus refetch");
                        poll_now(&inner);
                    }
                }
            }) as Box<dyn FnMut(web::FocusEvent)>);
            window
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            *inner.on_focus.borrow_mut() = Some(closure);
        }

        connect(&inner);
        poll_now(&inner);
        update_polling(&inner);
        Ok(LiveStatus { inner })
    }

    pub fn current(&self) -> Option<Rc<Status>> {
        self.inner.sync.borrow().current()
    }

    /// `true` while the socket supplies the current snapshot.
    pub fn is_live(&self) -> bool {
        self.inner.sync.borrow().is_live()
    }

    /// Called with every new authoritative snapshot, and once immediately if
    /// one already exists. The tag says which channel it came from.
    pub fn on_change(&self, listener: impl Fn(&Authoritative) + 'static) {
        let current = self.inner.sync.borrow().authoritative().cloned();
        if let Some(current) = current {
            listener(&current);
        }
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(id) = self.poll_timer.take() {
            if let Some(w) = web::window() {
                w.clear_interval_with_handle(id);
            }
        }
        if let (Some(w), Some(cb)) = (web::window(), self.on_focus.borrow().as_ref()) {
            _ = w.remove_event_listener_with_callback("focus", cb.as_ref().unchecked_ref());
        }
    }
}

fn notify(inner: &Rc<Inner>) {
    let Some(current) = inner.sync.borrow().authoritative().cloned() else {
        return;
    };
    for listener in inner.listeners.borrow().iter() {
        listener(&current);
    }
}

fn apply(inner: &Rc<Inner>, changed: bool) {
    update_polling(inner);
    if changed {
        notify(inner);
    }
}

/// Start or stop the poll interval to match the socket state.
fn update_polling(inner: &Rc<Inner>) {
    let Some(window) = web::window() else {
        return;
    };
    let wanted = inner.sync.borrow().poll_interval_ms();
    match (wanted, inner.poll_timer.get()) {
        (Some(ms), None) => {
            let tick = inner.poll_tick.borrow();
            let Some(cb) = tick.as_ref() else {
                return;
            };
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                ms as i32,
            ) {
                Ok(id) => {
                    log::debug!("[status] polling every {}ms", ms);
                    inner.poll_timer.set(Some(id));
                }
                Err(e) => log::warn!("[status] setInterval failed: {:?}", e),
            }
        }
        (None, Some(id)) => {
            log::debug!("[status] socket live; polling paused");
            window.clear_interval_with_handle(id);
            inner.poll_timer.set(None);
        }
        _ => {}
    }
}

fn poll_now(inner: &Rc<Inner>) {
    if inner.poll_in_flight.replace(true) {
        return;
    }
    let weak = Rc::downgrade(inner);
    let path = inner.config.status_path.clone();
    spawn_local(async move {
        let result = net::fetch_status(&path).await;
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.poll_in_flight.set(false);
        let changed = inner.sync.borrow_mut().on_poll_result(result);
        apply(&inner, changed);
    });
}

fn connect(inner: &Rc<Inner>) {
    let Some(location) = web::window().map(|w| w.location()) else {
        return;
    };
    let protocol = location.protocol().unwrap_or_default();
    let host = location.host().unwrap_or_default();
    let socket_url = url::socket_url(&protocol, &host, &inner.config.ws_path);

    let ws = match web::WebSocket::new(&socket_url) {
        Ok(ws) => ws,
        Err(e) => {
            log::warn!("[status] socket {} failed: {:?}", socket_url, e);
            schedule_reconnect(inner);
            return;
        }
    };
    log::info!("[status] connecting {}", socket_url);

    let generation = inner.generation.get() + 1;
    inner.generation.set(generation);

    let weak = Rc::downgrade(inner);
    let on_open = Closure::wrap(Box::new(move |_ev: web::Event| {
        with_current(&weak, generation, |inner| {
            let changed = inner.sync.borrow_mut().on_socket_state(SocketState::Open);
            apply(inner, changed);
        });
    }) as Box<dyn FnMut(web::Event)>);

    let weak = Rc::downgrade(inner);
    let on_message = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
        with_current(&weak, generation, |inner| {
            let Some(text) = ev.data().as_string() else {
                log::warn!("[status] non-text socket frame discarded");
                return;
            };
            let changed = inner.sync.borrow_mut().on_socket_message(&text);
            if changed {
                notify(inner);
            }
        });
    }) as Box<dyn FnMut(web::MessageEvent)>);

    let weak = Rc::downgrade(inner);
    let on_close = Closure::wrap(Box::new(move |ev: web::CloseEvent| {
        with_current(&weak, generation, |inner| {
            log::info!("[status] socket closed (code {})", ev.code());
            let changed = inner.sync.borrow_mut().on_socket_state(SocketState::Closed);
            apply(inner, changed);
            schedule_reconnect(inner);
        });
    }) as Box<dyn FnMut(web::CloseEvent)>);

    let on_error = Closure::wrap(Box::new(move |_ev: web::Event| {
        log::debug!("[status] socket error");
    }) as Box<dyn FnMut(web::Event)>);

    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let changed = inner
        .sync
        .borrow_mut()
        .on_socket_state(SocketState::from_ready_state(ws.ready_state()));
    // The previous socket (if any) is dropped here, outside its own handlers.
    *inner.socket.borrow_mut() = Some(Socket {
        ws,
        _on_open: on_open,
        _on_message: on_message,
        _on_close: on_close,
        _on_error: on_error,
    });
    apply(inner, changed);
}

/// Run `f` only if `generation` is still the live connection.
fn with_current(weak: &Weak<Inner>, generation: u64, f: impl FnOnce(&Rc<Inner>)) {
    if let Some(inner) = weak.upgrade() {
        if inner.generation.get() == generation {
            f(&inner);
        }
    }
}

fn schedule_reconnect(inner: &Rc<Inner>) {
    let Some(window) = web::window() else {
        return;
    };
    let weak = Rc::downgrade(inner);
    let delay = inner.config.reconnect_delay_ms as i32;
    let cb = Closure::once_into_js(move || {
        if let Some(inner) = weak.upgrade() {
            connect(&inner);
        }
    });
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay)
    {
        log::warn!("[status] reconnect timer failed: {:?}", e);
    }
}

thread_local! {
    static LIVE: RefCell<Option<LiveStatus>> = const { RefCell::new(None) };
}

/// Install the process-wide feed read by [`current_status`] and [`is_live`].
pub fn install(live: LiveStatus) {
    LIVE.with(|l| *l.borrow_mut() = Some(live));
}

pub fn current_status() -> Option<Rc<Status>> {
    LIVE.with(|l| l.borrow().as_ref().and_then(|s| s.current()))
}

pub fn is_live() -> bool {
    LIVE.with(|l| l.borrow().as_ref().is_some_and(|s| s.is_live()))
}
