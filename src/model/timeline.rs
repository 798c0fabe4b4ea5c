use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::ProjectTask;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 4.0;
/// Factor applied by a single zoom in / zoom out step.
pub const ZOOM_STEP: f32 = 1.2;

/// Calendar range bounding the whole chart.
///
/// Owned by the caller and recomputed whenever the task set's extremes move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Timeline {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Span of a task set: earliest start to latest end.
    pub fn from_tasks(tasks: &[ProjectTask]) -> Option<Self> {
        let start = tasks.iter().map(|t| t.start).min()?;
        let end = tasks.iter().map(|t| t.end()).max()?;
        Some(Self { start, end })
    }

    /// Whole days between start and end.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Widen the range for display margins, saturating at the calendar's ends.
    pub fn padded(&self, days_before: i64, days_after: i64) -> Self {
        Self {
            start: self
                .start
                .checked_sub_signed(Duration::days(days_before))
                .unwrap_or(NaiveDate::MIN),
            end: self
                .end
                .checked_add_signed(Duration::days(days_after))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Session-local zoom and pan state of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Continuous zoom factor, always within [`MIN_ZOOM`, `MAX_ZOOM`].
    zoom_level: f32,
    /// Pixel translation (x, y).
    pub pan_offset: (f32, f32),
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            pan_offset: (0.0, 0.0),
        }
    }
}

impl ViewportState {
    pub fn new(zoom_level: f32) -> Self {
        let mut viewport = Self::default();
        viewport.set_zoom(zoom_level);
        viewport
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    /// Set the zoom, clamped into the allowed range. NaN leaves it unchanged.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom_level = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom in (increase pixels per day).
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom_level * ZOOM_STEP);
    }

    /// Zoom out (decrease pixels per day).
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom_level / ZOOM_STEP);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_offset.0 += dx;
        self.pan_offset.1 += dy;
    }

    /// Explicit "reset view".
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn timeline_spans_tasks() {
        let tasks = vec![
            ProjectTask::new("a", d(1, 10), 5),
            ProjectTask::new("b", d(1, 3), 2),
            ProjectTask::new("c", d(1, 20), 10),
        ];
        let tl = Timeline::from_tasks(&tasks).unwrap();
        assert_eq!(tl.start, d(1, 3));
        assert_eq!(tl.end, d(1, 30));
        assert_eq!(tl.total_days(), 27);
        assert!(Timeline::from_tasks(&[]).is_none());
    }

    #[test]
    fn padding_saturates_at_calendar_ends() {
        let tl = Timeline::new(NaiveDate::MIN, NaiveDate::MAX).padded(7, 30);
        assert_eq!(tl.start, NaiveDate::MIN);
        assert_eq!(tl.end, NaiveDate::MAX);

        let tl = Timeline::new(d(1, 10), d(1, 20)).padded(7, 30);
        assert_eq!(tl.start, d(1, 3));
        assert_eq!(tl.end, d(2, 19));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = ViewportState::default();
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom_level(), MAX_ZOOM);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom_level(), MIN_ZOOM);
        vp.set_zoom(f32::NAN);
        assert_eq!(vp.zoom_level(), MIN_ZOOM);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut vp = ViewportState::new(2.5);
        vp.pan_by(40.0, -12.0);
        vp.reset();
        assert_eq!(vp, ViewportState::default());
    }
}
