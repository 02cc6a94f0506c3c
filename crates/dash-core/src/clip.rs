//! Audio clip window selection over a waveform chart.
//!
//! A clip is described by how much is trimmed off each end of the recording,
//! in seconds. Dragging the start handle, the end handle, or the window body
//! maps a horizontal pixel delta onto the recording's duration.
use crate::drag::DragMove;

pub const BAR_WIDTH: f64 = 2.0;
pub const BAR_GAP: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipOffsets {
    pub offset_start: f64,
    pub offset_end: f64,
}

impl ClipOffsets {
    pub fn new(offset_start: f64, offset_end: f64) -> Self {
        Self {
            offset_start,
            offset_end,
        }
    }

    /// Playback position where the clip ends.
    pub fn end_time(&self, duration: f64) -> f64 {
        duration - self.offset_end
    }

    pub fn len(&self, duration: f64) -> f64 {
        (duration - self.offset_start - self.offset_end).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipHandle {
    Start,
    End,
    Window,
}

/// Apply one drag move to the clip. `chart_width` is the chart's rendered
/// width in pixels; `None` if it is not measurable.
pub fn drag_clip(
    handle: ClipHandle,
    mv: &DragMove<ClipOffsets>,
    duration: f64,
    chart_width: f64,
) -> Option<ClipOffsets> {
    if !(chart_width > 0.0) || !(duration > 0.0) {
        return None;
    }
    let shift = mv.dx / chart_width * duration;
    let prev = mv.prev;
    let next = match handle {
        ClipHandle::Start => ClipOffsets::new(
            (prev.offset_start + shift).clamp(0.0, (duration - prev.offset_end).max(0.0)),
            prev.offset_end,
        ),
        ClipHandle::End => ClipOffsets::new(
            prev.offset_start,
            (prev.offset_end - shift).clamp(0.0, (duration - prev.offset_start).max(0.0)),
        ),
        ClipHandle::Window => {
            // keep the window length fixed against both ends
            let shift = shift.clamp(-prev.offset_start, prev.offset_end);
            ClipOffsets::new(prev.offset_start + shift, prev.offset_end - shift)
        }
    };
    Some(next)
}

/// Number of waveform bars that fit in a chart `client_width` CSS pixels wide.
pub fn bar_count(client_width: f64, device_pixel_ratio: f64) -> u32 {
    let px = (client_width * device_pixel_ratio).max(0.0);
    (px / (BAR_WIDTH + BAR_GAP)).floor() as u32
}
