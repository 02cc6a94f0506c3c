//! Clip window editor over a waveform chart.
//!
//! Markup: a root with `data-duration` (seconds), a `[data-clip-chart]`
//! child, and `[data-clip-handle="start|end|window"]` handles. The current
//! offsets are mirrored to `data-offset-start`/`data-offset-end` and the
//! `--clip-start`/`--clip-end` custom properties; a `change` event fires on
//! the root when a drag ends.
use crate::dom;
use crate::events::pointer::{use_drag, DragBinding, DragHandlers};
use crate::frame;
use dash_core::clip::{bar_count, drag_clip, ClipHandle, ClipOffsets};
use dash_core::config::DragConfig;
use dash_core::constants::CHART_WIDTH_SETTLE_MS;
use dash_core::delayed::DelayedValue;
use dash_core::drag::DragMove;
use dash_core::frame::FrameSubscription;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys as web;

pub struct ClipEditor {
    offsets: Rc<Cell<ClipOffsets>>,
    _handles: Vec<DragBinding<ClipOffsets>>,
    _frame: FrameSubscription,
}

impl ClipEditor {
    pub fn offsets(&self) -> ClipOffsets {
        self.offsets.get()
    }
}

fn attr_f64(el: &web::Element, name: &str) -> Option<f64> {
    el.get_attribute(name)?.trim().parse().ok()
}

fn write_offsets(root: &web::HtmlElement, offsets: ClipOffsets, duration: f64) {
    _ = root.set_attribute("data-offset-start", &format!("{:.3}", offsets.offset_start));
    _ = root.set_attribute("data-offset-end", &format!("{:.3}", offsets.offset_end));
    dom::set_style(root, "--clip-start", &format!("{:.3}%", offsets.offset_start / duration * 100.0));
    dom::set_style(root, "--clip-end", &format!("{:.3}%", offsets.offset_end / duration * 100.0));
}

pub fn mount_clip_editor(root: web::HtmlElement, drag: DragConfig) -> anyhow::Result<ClipEditor> {
    let duration = attr_f64(&root, "data-duration")
        .filter(|d| *d > 0.0)
        .ok_or_else(|| anyhow::anyhow!("clip editor needs a positive data-duration"))?;
    let chart: web::HtmlElement = dom::query(&root, "[data-clip-chart]")
        .ok_or_else(|| anyhow::anyhow!("clip editor has no [data-clip-chart]"))?;

    let initial = ClipOffsets::new(
        attr_f64(&root, "data-offset-start").unwrap_or(0.0),
        attr_f64(&root, "data-offset-end").unwrap_or(0.0),
    );
    let offsets = Rc::new(Cell::new(initial));
    write_offsets(&root, initial, duration);

    let mut handles = Vec::with_capacity(3);
    for (handle, selector) in [
        (ClipHandle::Start, "[data-clip-handle=\"start\"]"),
        (ClipHandle::End, "[data-clip-handle=\"end\"]"),
        (ClipHandle::Window, "[data-clip-handle=\"window\"]"),
    ] {
        let Some(el) = dom::query::<web::Element>(&root, selector) else {
            log::debug!("[drag] clip editor has no {:?} handle", handle);
            continue;
        };
        let base = {
            let offsets = offsets.clone();
            Box::new(move || Some(offsets.get()))
        };
        let on_move = {
            let offsets = offsets.clone();
            let root = root.clone();
            let chart = chart.clone();
            Box::new(move |mv: DragMove<ClipOffsets>| {
                // measured on every move; the chart may have been resized mid-drag
                let width = chart.client_width() as f64;
                if let Some(next) = drag_clip(handle, &mv, duration, width) {
                    offsets.set(next);
                    write_offsets(&root, next, duration);
                }
            })
        };
        let on_end = {
            let root = root.clone();
            Box::new(move || {
                if let Ok(ev) = web::Event::new("change") {
                    _ = root.dispatch_event(&ev);
                }
            })
        };
        handles.push(use_drag(
            &el,
            DragHandlers {
                base,
                on_move,
                on_end,
            },
            &drag,
        )?);
    }

    let bars = RefCell::new(DelayedValue::new(0u32, CHART_WIDTH_SETTLE_MS));
    let frame = {
        let root = root.clone();
        frame::subscribe_frame(move |tick| {
            let now_ms = tick.time * 1000.0;
            let mut bars = bars.borrow_mut();
            bars.set(bar_count(chart.client_width() as f64, dom::device_pixel_ratio()), now_ms);
            if bars.update(now_ms) {
                log::debug!("[clip] chart fits {} bars", bars.value());
                _ = root.set_attribute("data-bar-count", &bars.value().to_string());
            }
        })
    };

    Ok(ClipEditor {
        offsets,
        _handles: handles,
        _frame: frame,
    })
}
