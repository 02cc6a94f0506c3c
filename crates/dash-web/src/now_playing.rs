//! "Now playing" card: headline text, live badge and an animated progress
//! bar that restarts with a hard cut whenever the track changes.
use crate::dom;
use crate::frame;
use crate::spring::use_spring_value;
use crate::status::LiveStatus;
use dash_core::config::SpringConfig;
use dash_core::frame::FrameSubscription;
use dash_core::spring::SpringHandle;
use dash_core::status::Status;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys as web;

pub struct NowPlaying {
    progress: Rc<SpringHandle>,
    _frame: FrameSubscription,
}

impl NowPlaying {
    pub fn progress(&self) -> f64 {
        self.progress.value()
    }
}

#[derive(Clone, Copy, Default)]
struct Timing {
    started_ms: Option<f64>,
    duration_secs: Option<f64>,
}

impl Timing {
    fn from_status(status: &Status) -> Timing {
        let started_ms = status
            .started_at
            .as_deref()
            .map(js_sys::Date::parse)
            .filter(|t| t.is_finite());
        let duration_secs = status
            .track
            .as_ref()
            .and_then(|t| t.duration_seconds)
            .or(status.duration_seconds)
            .filter(|d| *d > 0.0);
        Timing {
            started_ms,
            duration_secs,
        }
    }

    fn fraction(&self, now_ms: f64) -> Option<f64> {
        let elapsed = (now_ms - self.started_ms?) / 1000.0;
        Some((elapsed / self.duration_secs?).clamp(0.0, 1.0))
    }
}

/// Bind `#now-playing` (children `[data-np-title]`, `[data-np-artist]`,
/// `[data-np-progress]`) to the live status feed.
pub fn mount_now_playing(
    document: &web::Document,
    live: &LiveStatus,
    spring: SpringConfig,
) -> Option<NowPlaying> {
    let root: web::HtmlElement = dom::element_by_id(document, "now-playing")?;
    let title: Option<web::Element> = dom::query(&root, "[data-np-title]");
    let artist: Option<web::Element> = dom::query(&root, "[data-np-artist]");
    let bar: Option<web::HtmlElement> = dom::query(&root, "[data-np-progress]");

    let progress = Rc::new(use_spring_value(0.0, spring.damping, spring.speed));
    let timing = Rc::new(Cell::new(Timing::default()));
    let track_key: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    {
        let progress = progress.clone();
        let timing = timing.clone();
        let root = root.clone();
        live.on_change(move |a| {
            let s = a.status();
            if let Some(el) = &title {
                let text = s.track.as_ref().map(|t| t.track_name.as_str()).unwrap_or(&s.message);
                el.set_text_content(Some(text));
            }
            if let Some(el) = &artist {
                let text = s.track.as_ref().and_then(|t| t.artist_name.as_deref()).unwrap_or("");
                el.set_text_content(Some(text));
            }
            _ = root.class_list().toggle_with_force("is-live", a.is_live());

            let key = s.track_key().map(str::to_owned);
            if *track_key.borrow() != key {
                log::info!("[status] now playing: {}", s.headline());
                *track_key.borrow_mut() = key;
                progress.hard_cut(0.0);
            }
            timing.set(Timing::from_status(s));
        });
    }

    let frame = {
        let progress = progress.clone();
        frame::subscribe_frame(move |_tick| {
            let goal = timing.get().fraction(js_sys::Date::now()).unwrap_or(0.0);
            if (goal - progress.goal()).abs() > f64::EPSILON {
                progress.set_goal(goal);
            }
            if let Some(bar) = &bar {
                dom::set_style(bar, "width", &format!("{:.3}%", progress.value() * 100.0));
            }
        })
    };

    Some(NowPlaying {
        progress,
        _frame: frame,
    })
}
