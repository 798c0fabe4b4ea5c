//! Date-to-pixel mapping for task bars and rows.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::ProjectTask;

/// Width of one calendar day at zoom 1.0.
pub const DEFAULT_DAY_WIDTH_PX: f32 = 120.0;

/// Horizontal placement of a task bar relative to the timeline start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x_offset: f32,
    pub width_px: f32,
}

impl BarGeometry {
    pub fn end_x(&self) -> f32 {
        self.x_offset + self.width_px
    }
}

/// Project a task onto the horizontal axis.
///
/// Tasks that begin before `timeline_start` get a negative offset; the caller
/// renders them off-screen left rather than clamping.
pub fn project(
    task: &ProjectTask,
    timeline_start: NaiveDate,
    zoom_level: f32,
    day_width_px: f32,
) -> BarGeometry {
    let days_from_start = (task.start - timeline_start).num_days() as f32;
    let px_per_day = day_width_px * zoom_level;
    BarGeometry {
        x_offset: days_from_start * px_per_day,
        width_px: task.duration() as f32 * px_per_day,
    }
}

/// Convert a date to an x-pixel offset from the timeline start.
pub fn date_to_x(date: NaiveDate, timeline_start: NaiveDate, zoom_level: f32, day_width_px: f32) -> f32 {
    (date - timeline_start).num_days() as f32 * day_width_px * zoom_level
}

/// Convert an x-pixel offset back to the nearest date.
pub fn x_to_date(x: f32, timeline_start: NaiveDate, zoom_level: f32, day_width_px: f32) -> NaiveDate {
    let px_per_day = day_width_px * zoom_level;
    if px_per_day <= 0.0 {
        return timeline_start;
    }
    let days = (x / px_per_day).round() as i64;
    Duration::try_days(days)
        .and_then(|shift| timeline_start.checked_add_signed(shift))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Vertical layout of chart rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    pub row_height: f32,
    pub row_gap: f32,
    pub header_height: f32,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            row_height: 30.0,
            row_gap: 2.0,
            header_height: 44.0,
        }
    }
}

impl RowLayout {
    /// Top edge of row `index`, below the header.
    pub fn row_top(&self, index: usize) -> f32 {
        self.header_height + index as f32 * (self.row_height + self.row_gap)
    }

    pub fn row_center_y(&self, index: usize) -> f32 {
        self.row_top(index) + self.row_gap + self.row_height / 2.0
    }

    /// Height needed to show `rows` rows plus the header.
    pub fn content_height(&self, rows: usize) -> f32 {
        self.row_top(rows)
    }
}

/// Everything needed to place tasks on the canvas for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub timeline_start: NaiveDate,
    pub zoom_level: f32,
    pub day_width_px: f32,
    pub rows: RowLayout,
}

impl ChartGeometry {
    pub fn new(timeline_start: NaiveDate, zoom_level: f32) -> Self {
        Self {
            timeline_start,
            zoom_level,
            day_width_px: DEFAULT_DAY_WIDTH_PX,
            rows: RowLayout::default(),
        }
    }

    pub fn bar(&self, task: &ProjectTask) -> BarGeometry {
        project(task, self.timeline_start, self.zoom_level, self.day_width_px)
    }

    pub fn date_x(&self, date: NaiveDate) -> f32 {
        date_to_x(date, self.timeline_start, self.zoom_level, self.day_width_px)
    }

    pub fn x_date(&self, x: f32) -> NaiveDate {
        x_to_date(x, self.timeline_start, self.zoom_level, self.day_width_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn projects_offset_and_width() {
        let task = ProjectTask::new("a", d(4), 2);
        let geo = project(&task, d(1), 1.0, DEFAULT_DAY_WIDTH_PX);
        assert_eq!(geo.x_offset, 360.0);
        assert_eq!(geo.width_px, 240.0);
        assert_eq!(geo.end_x(), 600.0);
    }

    #[test]
    fn tasks_before_the_timeline_go_negative() {
        let task = ProjectTask::new("early", d(1), 3);
        let geo = project(&task, d(3), 0.5, 100.0);
        assert_eq!(geo.x_offset, -100.0);
    }

    #[test]
    fn x_to_date_inverts_date_to_x() {
        let x = date_to_x(d(9), d(1), 1.5, 40.0);
        assert_eq!(x_to_date(x, d(1), 1.5, 40.0), d(9));
        assert_eq!(x_to_date(x + 20.0, d(1), 1.5, 40.0), d(9));
    }

    #[test]
    fn rows_stack_below_header() {
        let layout = RowLayout::default();
        assert_eq!(layout.row_top(0), 44.0);
        assert_eq!(layout.row_top(2), 44.0 + 64.0);
        assert_eq!(layout.row_center_y(0), 44.0 + 2.0 + 15.0);
    }
}
