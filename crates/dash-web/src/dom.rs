use dash_core::config::DashboardConfig;
use dash_core::scroll::ScrollMetrics;
use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys as web;

pub const CONFIG_SCRIPT_ID: &str = "dashboard-config";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query<T: JsCast>(root: &web::Element, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Read the optional JSON override embedded in the page. Anything unreadable
/// falls back to defaults.
pub fn read_config(document: &web::Document) -> DashboardConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
    else {
        return DashboardConfig::default();
    };
    if text.trim().is_empty() {
        return DashboardConfig::default();
    }
    match DashboardConfig::from_json(&text) {
        Ok(cfg) => {
            log::info!("[config] loaded override from #{}", CONFIG_SCRIPT_ID);
            cfg
        }
        Err(e) => {
            log::warn!("[config] ignoring #{}: {}", CONFIG_SCRIPT_ID, e);
            DashboardConfig::default()
        }
    }
}

/// Layout viewport in CSS pixels.
pub fn viewport_size() -> Option<DVec2> {
    let w = web::window()?;
    let width = w.inner_width().ok()?.as_f64()?;
    let height = w.inner_height().ok()?.as_f64()?;
    Some(DVec2::new(width, height))
}

pub fn device_pixel_ratio() -> f64 {
    web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// `None` once the element has left the document.
pub fn scroll_metrics(el: &web::Element) -> Option<ScrollMetrics> {
    if !el.is_connected() {
        return None;
    }
    Some(ScrollMetrics {
        scroll_height: el.scroll_height() as f64,
        scroll_top: el.scroll_top() as f64,
        client_height: el.client_height() as f64,
    })
}

/// Top-left of the element's border box in viewport coordinates.
pub fn client_origin(el: &web::Element) -> Option<DVec2> {
    if !el.is_connected() {
        return None;
    }
    let rect = el.get_bounding_client_rect();
    Some(DVec2::new(rect.left(), rect.top()))
}

#[inline]
pub fn set_style(el: &web::HtmlElement, prop: &str, value: &str) {
    _ = el.style().set_property(prop, value);
}

#[inline]
pub fn set_px(el: &web::HtmlElement, prop: &str, value: f64) {
    set_style(el, prop, &format!("{:.2}px", value));
}

pub fn set_text_by_id(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}
