//! Display granularity for the timeline header.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::Timeline;

/// Controls what unit the timeline header ticks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleUnit {
    Day,
    Week,
    Month,
}

impl ScaleUnit {
    /// chrono format string for tick labels.
    pub fn label_format(self) -> &'static str {
        match self {
            ScaleUnit::Day => "%d",
            ScaleUnit::Week => "W%V",
            ScaleUnit::Month => "%b %Y",
        }
    }
}

/// Result of [`select_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineScale {
    pub unit: ScaleUnit,
    /// Number of units spanned by the range.
    pub count: i64,
    /// Units between labelled ticks.
    pub step: u32,
}

/// Pick a granularity for a date range.
///
/// Boundaries are inclusive on the finer side: exactly 30 days stays in
/// days, 90 in weeks, 365 in single months.
pub fn select_scale(start: NaiveDate, end: NaiveDate) -> TimelineScale {
    let total_days = (end - start).num_days();

    if total_days <= 30 {
        TimelineScale {
            unit: ScaleUnit::Day,
            count: total_days,
            step: 1,
        }
    } else if total_days <= 90 {
        TimelineScale {
            unit: ScaleUnit::Week,
            count: div_ceil(total_days, 7),
            step: 1,
        }
    } else if total_days <= 365 {
        TimelineScale {
            unit: ScaleUnit::Month,
            count: div_ceil(total_days, 30),
            step: 1,
        }
    } else {
        TimelineScale {
            unit: ScaleUnit::Month,
            count: div_ceil(total_days, 30),
            step: 3,
        }
    }
}

fn div_ceil(n: i64, d: i64) -> i64 {
    (n + d - 1).div_euclid(d)
}

/// Tick dates for the header of `timeline` at `scale`.
///
/// Weeks are aligned to Monday and months to the first of the month, so the
/// first tick may fall slightly before `timeline.start`.
pub fn ticks(timeline: &Timeline, scale: &TimelineScale) -> Vec<NaiveDate> {
    let step = scale.step.max(1);
    let mut out = Vec::new();

    match scale.unit {
        ScaleUnit::Day => {
            let mut date = timeline.start;
            while date <= timeline.end {
                out.push(date);
                match date.checked_add_signed(Duration::days(i64::from(step))) {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }
        ScaleUnit::Week => {
            let weekday = timeline.start.weekday().num_days_from_monday();
            let mut date = timeline
                .start
                .checked_sub_signed(Duration::days(i64::from(weekday)))
                .unwrap_or(timeline.start);
            while date <= timeline.end {
                out.push(date);
                match date.checked_add_signed(Duration::days(7 * i64::from(step))) {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }
        ScaleUnit::Month => {
            let mut date = timeline.start.with_day(1).unwrap_or(timeline.start);
            while date <= timeline.end {
                out.push(date);
                match date.checked_add_months(Months::new(step)) {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }
    }

    out
}
