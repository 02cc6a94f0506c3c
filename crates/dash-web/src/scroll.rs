//! Predictive loading for the history list.
use crate::dom;
use crate::frame;
use crate::net;
use dash_core::config::ScrollConfig;
use dash_core::constants::HISTORY_PATH;
use dash_core::error::FetchError;
use dash_core::frame::FrameSubscription;
use dash_core::history::{HistoryEntry, HistoryPager};
use dash_core::scroll::ScrollPredictor;
use instant::Instant;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type PageFuture = Pin<Box<dyn Future<Output = Result<usize, FetchError>>>>;

/// A paged data source the loader can pull from.
pub trait Pager {
    fn has_next_page(&self) -> bool;
    /// Fetch and apply the next page; resolves to the number of new items.
    fn fetch_next_page(&self) -> PageFuture;
}

/// Keeps the loader running; dropping it stops sampling.
pub struct ScrollPredictorHandle {
    predictor: Rc<RefCell<ScrollPredictor>>,
    _frame: FrameSubscription,
}

impl ScrollPredictorHandle {
    pub fn is_fetching(&self) -> bool {
        self.predictor.borrow().is_fetching()
    }
}

pub fn attach_scroll_predictor(
    container: web::Element,
    pager: Rc<dyn Pager>,
    config: ScrollConfig,
) -> ScrollPredictorHandle {
    let predictor = Rc::new(RefCell::new(ScrollPredictor::new(config)));
    let frame = {
        let predictor = predictor.clone();
        frame::subscribe_frame(move |tick| {
            let metrics = dom::scroll_metrics(&container);
            let fetch = predictor
                .borrow_mut()
                .observe(metrics, tick, pager.has_next_page());
            if !fetch {
                return;
            }
            let predictor = predictor.clone();
            let pager = pager.clone();
            spawn_local(async move {
                let started = Instant::now();
                match pager.fetch_next_page().await {
                    Ok(added) => {
                        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                        log::debug!("[scroll] page loaded: {} items in {:.0}ms", added, elapsed_ms);
                        predictor.borrow_mut().finish_fetch(elapsed_ms);
                    }
                    Err(e) => {
                        log::debug!("[scroll] page fetch failed: {}", e);
                        predictor.borrow_mut().fail_fetch();
                    }
                }
            });
        })
    };
    ScrollPredictorHandle {
        predictor,
        _frame: frame,
    }
}

/// History list backed by `/api/history`, rendering each entry as an `<li>`.
#[derive(Clone)]
pub struct HistoryFeed {
    inner: Rc<FeedInner>,
}

struct FeedInner {
    pager: RefCell<HistoryPager>,
    list: web::Element,
}

impl HistoryFeed {
    pub fn new(list: web::Element) -> HistoryFeed {
        HistoryFeed {
            inner: Rc::new(FeedInner {
                pager: RefCell::new(HistoryPager::new()),
                list,
            }),
        }
    }
}

impl FeedInner {
    fn render(&self, entries: &[HistoryEntry]) {
        let Some(document) = self.list.owner_document() else {
            return;
        };
        for entry in entries {
            let Ok(item) = document.create_element("li") else {
                continue;
            };
            let artist = entry.track.artist_name.as_deref().unwrap_or("Unknown artist");
            item.set_text_content(Some(&format!("{} - {}", entry.track.track_name, artist)));
            _ = item.set_attribute("data-entry-id", &entry.entry_id);
            _ = item.set_attribute("data-detected-at", &entry.detected_at);
            _ = self.list.append_child(&item);
        }
    }
}

impl Pager for HistoryFeed {
    fn has_next_page(&self) -> bool {
        self.inner.pager.borrow().has_next_page()
    }

    fn fetch_next_page(&self) -> PageFuture {
        let inner = self.inner.clone();
        Box::pin(async move {
            let path = inner
                .pager
                .borrow()
                .next_request_path(HISTORY_PATH)
                .ok_or(FetchError::Exhausted)?;
            let page = net::fetch_history_page(&path).await?;
            let before = inner.pager.borrow().entries().len();
            let added = inner.pager.borrow_mut().apply_page(page)?;
            let pager = inner.pager.borrow();
            inner.render(&pager.entries()[before..]);
            Ok(added)
        })
    }
}
