//! Pointer-driven move and resize of task bars.
//!
//! The interpreter is an explicit two-state machine. Pointer-down over a bar
//! or one of its handles captures an anchor, every pointer-move converts the
//! horizontal displacement into whole days and yields a complete updated
//! task, and pointer-up or pointer-leave returns to idle. Frames that would
//! put the start on or after the end are dropped without changing anything.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ProjectTask;

/// Which part of a task bar was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragType {
    /// The whole bar.
    Move,
    /// The left handle.
    ResizeStart,
    /// The right handle.
    ResizeEnd,
}

/// Date captured at pointer-down, named by what it anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAnchor {
    Move { start: NaiveDate },
    ResizeStart { start: NaiveDate },
    ResizeEnd { end: NaiveDate },
}

impl DragAnchor {
    fn capture(task: &ProjectTask, drag_type: DragType) -> Self {
        match drag_type {
            DragType::Move => DragAnchor::Move { start: task.start },
            DragType::ResizeStart => DragAnchor::ResizeStart { start: task.start },
            DragType::ResizeEnd => DragAnchor::ResizeEnd { end: task.end() },
        }
    }

    pub fn drag_type(&self) -> DragType {
        match self {
            DragAnchor::Move { .. } => DragType::Move,
            DragAnchor::ResizeStart { .. } => DragType::ResizeStart,
            DragAnchor::ResizeEnd { .. } => DragType::ResizeEnd,
        }
    }
}

/// An in-flight gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub task_id: Uuid,
    pub anchor: DragAnchor,
    pub start_pointer_x: f32,
    /// Recorded with the press; day arithmetic only reads the x axis.
    pub start_pointer_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Returned when a pointer-down arrives while another drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a drag of task {active} is already in progress")]
pub struct DragRejected {
    /// Task of the gesture that keeps running.
    pub active: Uuid,
}

/// Whole-day displacement for a horizontal pointer delta.
///
/// One day occupies `day_width_px * zoom_level` pixels on screen, the same
/// ratio [`crate::projection::project`] uses, so the bar follows the pointer
/// at every zoom.
/// At zoom 1.0 this is `(dx * zoom) / (day_width / zoom)`, which the
/// zoom-cancelling form generalizes.
pub fn day_delta(pointer_dx: f32, zoom_level: f32, day_width_px: f32) -> i64 {
    let px_per_day = day_width_px * zoom_level;
    if px_per_day.is_nan() || px_per_day <= 0.0 || !pointer_dx.is_finite() {
        return 0;
    }
    (pointer_dx / px_per_day).round() as i64
}

/// Apply a day delta to `task` for the given anchor.
///
/// Returns `None` when the result would violate `start < end`.
pub fn apply_delta(task: &ProjectTask, anchor: DragAnchor, days: i64) -> Option<ProjectTask> {
    let shift = Duration::try_days(days)?;
    let mut updated = task.clone();

    match anchor {
        DragAnchor::Move { start } => {
            updated.start = start.checked_add_signed(shift)?;
        }
        DragAnchor::ResizeStart { start } => {
            let new_start = start.checked_add_signed(shift)?;
            let current_end = task.end();
            if new_start >= current_end {
                return None;
            }
            let duration = u32::try_from((current_end - new_start).num_days()).ok()?;
            updated.start = new_start;
            updated.set_duration(duration);
        }
        DragAnchor::ResizeEnd { end } => {
            let new_end = end.checked_add_signed(shift)?;
            if !updated.set_end(new_end) {
                return None;
            }
        }
    }

    Some(updated)
}

/// Owns the single [`DragState`] of a chart surface.
#[derive(Debug, Clone, Default)]
pub struct DragInterpreter {
    state: DragState,
}

impl DragInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active_task(&self) -> Option<Uuid> {
        match self.state {
            DragState::Dragging(active) => Some(active.task_id),
            DragState::Idle => None,
        }
    }

    /// Start a gesture on `task`. Only one gesture may run at a time.
    pub fn pointer_down(
        &mut self,
        task: &ProjectTask,
        drag_type: DragType,
        pointer_x: f32,
        pointer_y: f32,
    ) -> Result<(), DragRejected> {
        if let DragState::Dragging(active) = self.state {
            tracing::debug!(
                active = %active.task_id,
                requested = %task.id,
                "ignoring pointer-down during an active drag"
            );
            return Err(DragRejected {
                active: active.task_id,
            });
        }

        self.state = DragState::Dragging(ActiveDrag {
            task_id: task.id,
            anchor: DragAnchor::capture(task, drag_type),
            start_pointer_x: pointer_x,
            start_pointer_y: pointer_y,
        });
        tracing::debug!(task = %task.id, ?drag_type, "drag started");
        Ok(())
    }

    /// Interpret a pointer-move against the current version of the dragged task.
    ///
    /// Returns the full updated task, or `None` when idle, when `task` is not
    /// the one being dragged, or when the frame would invert the bar.
    pub fn pointer_move(
        &self,
        task: &ProjectTask,
        pointer_x: f32,
        zoom_level: f32,
        day_width_px: f32,
    ) -> Option<ProjectTask> {
        let DragState::Dragging(active) = self.state else {
            return None;
        };
        if active.task_id != task.id {
            return None;
        }

        let days = day_delta(pointer_x - active.start_pointer_x, zoom_level, day_width_px);
        let updated = apply_delta(task, active.anchor, days);
        if updated.is_none() {
            tracing::trace!(task = %task.id, days, "drag frame rejected");
        }
        updated
    }

    /// End the gesture. Returns the task whose drag finished, if any.
    pub fn pointer_up(&mut self) -> Option<Uuid> {
        let finished = self.active_task();
        self.state = DragState::Idle;
        if let Some(id) = finished {
            tracing::debug!(task = %id, "drag finished");
        }
        finished
    }

    /// Pointer left the surface; same as releasing.
    pub fn pointer_leave(&mut self) -> Option<Uuid> {
        self.pointer_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::DEFAULT_DAY_WIDTH_PX;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn resize_end_by_three_days() {
        let task = ProjectTask::new("Spec", d(1, 1), 5);
        let mut drag = DragInterpreter::new();
        drag.pointer_down(&task, DragType::ResizeEnd, 500.0, 10.0).unwrap();

        let updated = drag
            .pointer_move(&task, 500.0 + 3.0 * DEFAULT_DAY_WIDTH_PX, 1.0, DEFAULT_DAY_WIDTH_PX)
            .unwrap();
        assert_eq!(updated.start, d(1, 1));
        assert_eq!(updated.duration(), 8);
        assert_eq!(updated.end(), d(1, 9));
    }

    #[test]
    fn move_keeps_duration() {
        let task = ProjectTask::new("Build", d(3, 10), 4);
        let mut drag = DragInterpreter::new();
        drag.pointer_down(&task, DragType::Move, 0.0, 0.0).unwrap();

        let updated = drag.pointer_move(&task, -250.0, 1.0, 100.0).unwrap();
        assert_eq!(updated.start, d(3, 7));
        assert_eq!(updated.duration(), 4);
    }

    #[test]
    fn resize_start_cannot_cross_end() {
        let task = ProjectTask::new("Review", d(2, 1), 3);
        let mut drag = DragInterpreter::new();
        drag.pointer_down(&task, DragType::ResizeStart, 0.0, 0.0).unwrap();

        assert!(drag.pointer_move(&task, 300.0, 1.0, 100.0).is_none());
        let ok = drag.pointer_move(&task, 200.0, 1.0, 100.0).unwrap();
        assert_eq!(ok.start, d(2, 3));
        assert_eq!(ok.duration(), 1);
        assert_eq!(ok.end(), task.end());
    }

    #[test]
    fn resize_end_cannot_cross_start() {
        let task = ProjectTask::new("Review", d(2, 1), 3);
        let mut drag = DragInterpreter::new();
        drag.pointer_down(&task, DragType::ResizeEnd, 0.0, 0.0).unwrap();
        assert!(drag.pointer_move(&task, -300.0, 1.0, 100.0).is_none());
        assert_eq!(drag.pointer_move(&task, -200.0, 1.0, 100.0).unwrap().duration(), 1);
    }

    #[test]
    fn second_pointer_down_is_rejected() {
        let a = ProjectTask::new("a", d(1, 1), 2);
        let b = ProjectTask::new("b", d(1, 5), 2);
        let mut drag = DragInterpreter::new();
        drag.pointer_down(&a, DragType::Move, 0.0, 0.0).unwrap();

        let err = drag.pointer_down(&b, DragType::Move, 5.0, 5.0).unwrap_err();
        assert_eq!(err.active, a.id);
        assert_eq!(drag.active_task(), Some(a.id));
        assert!(drag.pointer_move(&b, 500.0, 1.0, 100.0).is_none());
    }

    #[test]
    fn release_returns_to_idle() {
        let task = ProjectTask::new("a", d(1, 1), 2);
        let mut drag = DragInterpreter::new();
        assert_eq!(drag.pointer_up(), None);
        drag.pointer_down(&task, DragType::Move, 0.0, 0.0).unwrap();
        assert_eq!(drag.pointer_leave(), Some(task.id));
        assert_eq!(*drag.state(), DragState::Idle);
        assert!(drag.pointer_move(&task, 400.0, 1.0, 100.0).is_none());
    }

    #[test]
    fn day_delta_scales_with_zoom() {
        assert_eq!(day_delta(240.0, 2.0, 120.0), 1);
        assert_eq!(day_delta(240.0, 0.5, 120.0), 4);
        assert_eq!(day_delta(59.0, 1.0, 120.0), 0);
        assert_eq!(day_delta(61.0, 1.0, 120.0), 1);
        assert_eq!(day_delta(f32::NAN, 1.0, 120.0), 0);
        assert_eq!(day_delta(100.0, 0.0, 120.0), 0);
    }
}
