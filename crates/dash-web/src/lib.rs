#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub mod clip;
pub mod dom;
pub mod events;
pub mod frame;
pub mod net;
pub mod now_playing;
pub mod panel;
pub mod scroll;
pub mod spring;
pub mod status;
pub mod url;

pub use events::pointer::{use_drag, DragBinding, DragHandlers};
pub use frame::subscribe_frame;
pub use scroll::{attach_scroll_predictor, Pager, ScrollPredictorHandle};
pub use spring::use_spring_value;
pub use status::{current_status, is_live, LiveStatus};

/// Everything mounted at startup; kept alive for the page's lifetime.
#[derive(Default)]
struct Mounted {
    _history: Option<scroll::ScrollPredictorHandle>,
    _panel: Option<panel::DraggablePanel>,
    _now_playing: Option<now_playing::NowPlaying>,
    _clips: Vec<clip::ClipEditor>,
}

thread_local! {
    static MOUNTED: RefCell<Mounted> = RefCell::new(Mounted::default());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("dash-web starting");

    spawn_local(async move {
        if let Err(e) = init() {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Mount every component present on the page. A component that fails to
/// mount is logged and skipped; the others stay up.
fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let config = dom::read_config(&document);
    let mut mounted = Mounted::default();

    match LiveStatus::start(config.status.clone()) {
        Ok(live) => {
            status::install(live.clone());
            let doc = document.clone();
            live.on_change(move |a| {
                dom::set_text_by_id(&doc, "status-headline", &a.status().headline());
            });
            mounted._now_playing = now_playing::mount_now_playing(&document, &live, config.spring);
        }
        Err(e) => log::error!("[status] live status not started: {:?}", e),
    }

    if let Some(list) = document.get_element_by_id("history-list") {
        let feed = scroll::HistoryFeed::new(list.clone());
        mounted._history = Some(attach_scroll_predictor(
            list,
            std::rc::Rc::new(feed),
            config.scroll,
        ));
        log::info!("[scroll] history list attached");
    }

    if let Some(el) = dom::element_by_id::<web::HtmlElement>(&document, "floating-track") {
        let handle: Option<web::Element> = dom::query(&el, "[data-resize-handle]");
        match panel::mount_draggable(el, handle, config.panel) {
            Ok(p) => {
                mounted._panel = Some(p);
                log::info!("[drag] floating panel mounted");
            }
            Err(e) => log::warn!("[drag] floating panel not mounted: {:?}", e),
        }
    }

    match document.query_selector_all("[data-clip-editor]") {
        Ok(roots) => {
            for i in 0..roots.length() {
                let Some(root) = roots
                    .item(i)
                    .and_then(|n| wasm_bindgen::JsCast::dyn_into::<web::HtmlElement>(n).ok())
                else {
                    continue;
                };
                match clip::mount_clip_editor(root, config.drag) {
                    Ok(editor) => mounted._clips.push(editor),
                    Err(e) => log::warn!("[clip] editor not mounted: {:?}", e),
                }
            }
        }
        Err(e) => log::warn!("[clip] editor lookup failed: {:?}", e),
    }

    MOUNTED.with(|m| *m.borrow_mut() = mounted);
    Ok(())
}

/// Current status headline, for page scripts.
#[wasm_bindgen]
pub fn status_headline() -> Option<String> {
    current_status().map(|s| s.headline())
}

#[wasm_bindgen]
pub fn status_is_live() -> bool {
    is_live()
}
