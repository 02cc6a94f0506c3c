//! Velocity-predictive infinite scroll.
//!
//! Each frame the predictor samples how far the container is from its bottom
//! edge, estimates when the user will arrive there from the last two samples,
//! and asks for the next page early enough that it lands before they do. The
//! lead window adapts to how long the previous fetch actually took.
use crate::config::ScrollConfig;
use crate::frame::FrameTick;

/// Scroll geometry of a container, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    #[inline]
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    /// Content fits in the viewport; there is nothing to scroll.
    #[inline]
    pub fn is_unscrollable(&self) -> bool {
        self.scroll_height <= self.client_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    pub distance_to_bottom: f64,
    /// Seconds, on the frame tick time base.
    pub timestamp: f64,
}

/// Milliseconds until `current` reaches the bottom at the velocity implied by
/// `previous -> current`. `None` when not moving toward the bottom.
pub fn predict_eta_ms(previous: ScrollSample, current: ScrollSample) -> Option<f64> {
    let dt_ms = (current.timestamp - previous.timestamp) * 1000.0;
    if !(dt_ms > 0.0) {
        return None;
    }
    let velocity = (current.distance_to_bottom - previous.distance_to_bottom) / dt_ms;
    if velocity < 0.0 {
        Some(current.distance_to_bottom / -velocity)
    } else {
        None
    }
}

#[derive(Clone, Debug)]
pub struct ScrollPredictor {
    config: ScrollConfig,
    previous: Option<ScrollSample>,
    last_fetch_duration_ms: f64,
    fetching: bool,
}

impl ScrollPredictor {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            last_fetch_duration_ms: config.initial_fetch_ms,
            config,
            previous: None,
            fetching: false,
        }
    }

    #[inline]
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    #[inline]
    pub fn last_fetch_duration_ms(&self) -> f64 {
        self.last_fetch_duration_ms
    }

    pub fn previous_sample(&self) -> Option<ScrollSample> {
        self.previous
    }

    /// The container went away; velocity restarts from scratch.
    pub fn detach(&mut self) {
        self.previous = None;
    }

    /// Sample one frame. Returns `true` when a page fetch should start now;
    /// the predictor is then marked busy until [`Self::finish_fetch`] or
    /// [`Self::fail_fetch`].
    pub fn observe(
        &mut self,
        metrics: Option<ScrollMetrics>,
        tick: FrameTick,
        has_next_page: bool,
    ) -> bool {
        let Some(metrics) = metrics else {
            self.detach();
            return false;
        };
        let current = ScrollSample {
            distance_to_bottom: metrics.distance_to_bottom(),
            timestamp: tick.time,
        };
        let eta_ms = self.previous.and_then(|prev| predict_eta_ms(prev, current));
        self.previous = Some(current);

        if !has_next_page || self.fetching {
            return false;
        }
        let imminent = eta_ms.is_some_and(|eta| eta >= 0.0 && eta <= self.last_fetch_duration_ms);
        if imminent || metrics.is_unscrollable() {
            log::debug!(
                "[scroll] prefetch (eta={:?}ms window={:.0}ms unscrollable={})",
                eta_ms,
                self.last_fetch_duration_ms,
                metrics.is_unscrollable()
            );
            self.fetching = true;
            return true;
        }
        false
    }

    /// A fetch completed after `elapsed_ms`; widen or narrow the next lead
    /// window accordingly.
    pub fn finish_fetch(&mut self, elapsed_ms: f64) {
        self.last_fetch_duration_ms = elapsed_ms.max(0.0) + self.config.lead_margin_ms;
        self.fetching = false;
    }

    /// A fetch failed; retrying is up to the pager.
    pub fn fail_fetch(&mut self) {
        self.fetching = false;
    }
}
