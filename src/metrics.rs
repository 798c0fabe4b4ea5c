//! Status partition and progress summary for a task list.
//!
//! The critical path itself comes from an external scheduler; this module
//! only reads it.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ProjectTask, TaskStatus};

/// One entry of an externally computed critical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathEntry {
    pub task_id: Uuid,
    pub is_critical: bool,
}

/// Lookup view over [`CriticalPathEntry`] values.
#[derive(Debug, Clone, Default)]
pub struct CriticalPath {
    critical: HashSet<Uuid>,
}

impl CriticalPath {
    pub fn new(entries: &[CriticalPathEntry]) -> Self {
        Self {
            critical: entries
                .iter()
                .filter(|e| e.is_critical)
                .map(|e| e.task_id)
                .collect(),
        }
    }

    pub fn is_critical(&self, task_id: Uuid) -> bool {
        self.critical.contains(&task_id)
    }

    pub fn is_empty(&self) -> bool {
        self.critical.is_empty()
    }
}

/// Dashboard summary of a task list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub blocked_tasks: usize,
    pub on_hold_tasks: usize,
    pub not_started_tasks: usize,
    /// Mean task progress in percent; 0 for an empty list.
    pub actual_progress: f64,
    /// Number of critical entries that refer to a task in the list.
    pub critical_path_length: usize,
    /// Latest end date on the critical path, or of any task when no path is known.
    pub estimated_completion: Option<NaiveDate>,
}

impl ProjectMetrics {
    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::NotStarted => self.not_started_tasks,
            TaskStatus::InProgress => self.in_progress_tasks,
            TaskStatus::Completed => self.completed_tasks,
            TaskStatus::Blocked => self.blocked_tasks,
            TaskStatus::OnHold => self.on_hold_tasks,
        }
    }
}

pub fn summarize(tasks: &[ProjectTask], critical_path: &[CriticalPathEntry]) -> ProjectMetrics {
    let mut metrics = ProjectMetrics {
        total_tasks: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::NotStarted => metrics.not_started_tasks += 1,
            TaskStatus::InProgress => metrics.in_progress_tasks += 1,
            TaskStatus::Completed => metrics.completed_tasks += 1,
            TaskStatus::Blocked => metrics.blocked_tasks += 1,
            TaskStatus::OnHold => metrics.on_hold_tasks += 1,
        }
    }

    if !tasks.is_empty() {
        let sum: u64 = tasks.iter().map(|t| u64::from(t.progress())).sum();
        metrics.actual_progress = sum as f64 / tasks.len() as f64;
    }

    let path = CriticalPath::new(critical_path);
    let critical: Vec<&ProjectTask> = tasks.iter().filter(|t| path.is_critical(t.id)).collect();
    metrics.critical_path_length = critical.len();

    metrics.estimated_completion = if critical.is_empty() {
        tasks.iter().map(|t| t.end()).max()
    } else {
        critical.iter().map(|t| t.end()).max()
    };

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    #[test]
    fn empty_list_is_all_zero() {
        let m = summarize(&[], &[]);
        assert_eq!(m.total_tasks, 0);
        assert_eq!(m.actual_progress, 0.0);
        assert_eq!(m.critical_path_length, 0);
        assert_eq!(m.estimated_completion, None);
    }

    #[test]
    fn averages_progress_and_partitions_status() {
        let tasks = vec![
            ProjectTask::new("a", d(1), 2).with_progress(100).with_status(TaskStatus::Completed),
            ProjectTask::new("b", d(2), 2).with_progress(50).with_status(TaskStatus::InProgress),
            ProjectTask::new("c", d(3), 2).with_status(TaskStatus::OnHold),
        ];
        let m = summarize(&tasks, &[]);
        assert_eq!(m.completed_tasks, 1);
        assert_eq!(m.in_progress_tasks, 1);
        assert_eq!(m.on_hold_tasks, 1);
        assert_eq!(m.actual_progress, 50.0);
        assert_eq!(m.estimated_completion, Some(d(5)));
    }

    #[test]
    fn critical_path_drives_completion() {
        let a = ProjectTask::new("a", d(1), 3);
        let b = ProjectTask::new("b", d(1), 20);
        let entries = vec![
            CriticalPathEntry { task_id: a.id, is_critical: true },
            CriticalPathEntry { task_id: b.id, is_critical: false },
            CriticalPathEntry { task_id: Uuid::new_v4(), is_critical: true },
        ];
        let m = summarize(&[a, b], &entries);
        assert_eq!(m.critical_path_length, 1);
        assert_eq!(m.estimated_completion, Some(d(4)));
    }
}
