use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Longest task the model accepts: one hundred years.
pub const MAX_DURATION_DAYS: u32 = 36_525;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Blocked,
    OnHold,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
        TaskStatus::OnHold,
    ];

    /// Wire name, as used in project files and CSV.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::OnHold => "on_hold",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "not_started" | "notstarted" | "new" | "planned" | "todo" => Ok(TaskStatus::NotStarted),
            "in_progress" | "inprogress" | "active" | "started" => Ok(TaskStatus::InProgress),
            "completed" | "complete" | "done" | "finished" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            "on_hold" | "onhold" | "paused" => Ok(TaskStatus::OnHold),
            _ => Err(format!("unknown task status '{}'", s.trim())),
        }
    }
}

/// Priority level for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Critical => "Critical",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" | "med" | "normal" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" | "urgent" => Ok(TaskPriority::Critical),
            other => Err(format!("unknown task priority '{}'", other)),
        }
    }
}

/// Represents the type of dependency between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyKind {
    pub fn short_label(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }
}

/// A dependency link between two tasks.
///
/// Both ids are expected to name tasks of the same project; a link whose
/// endpoint is missing is simply not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDependency {
    pub from_task: Uuid,
    pub to_task: Uuid,
    #[serde(default)]
    pub kind: DependencyKind,
}

impl ProjectDependency {
    pub fn finish_to_start(from_task: Uuid, to_task: Uuid) -> Self {
        Self {
            from_task,
            to_task,
            kind: DependencyKind::FinishToStart,
        }
    }

    pub fn touches(&self, id: Uuid) -> bool {
        self.from_task == id || self.to_task == id
    }
}

/// A single task in the Gantt chart.
///
/// The end date is never stored: it is always `start + duration` days, so
/// editing either representation keeps the other consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTask {
    pub id: Uuid,
    pub name: String,
    pub start: NaiveDate,
    /// Length in whole days, 1 to [`MAX_DURATION_DAYS`].
    duration: u32,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignee: Option<String>,
    /// Completion percentage, 0 to 100.
    #[serde(default, deserialize_with = "capped_progress")]
    progress: u8,
}

fn capped_progress<'de, D: Deserializer<'de>>(de: D) -> Result<u8, D::Error> {
    let raw = u64::deserialize(de)?;
    Ok(u8::try_from(raw.min(100)).unwrap_or(100))
}

impl ProjectTask {
    /// Create a new task with sensible defaults. The duration is clamped to
    /// `1..=MAX_DURATION_DAYS`.
    pub fn new(name: impl Into<String>, start: NaiveDate, duration: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            duration: duration.clamp(1, MAX_DURATION_DAYS),
            status: TaskStatus::NotStarted,
            priority: TaskPriority::Medium,
            assignee: None,
            progress: 0,
        }
    }

    /// Build a task from a start and end date. The end must be after the start
    /// and no more than [`MAX_DURATION_DAYS`] away.
    pub fn spanning(
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<Self> {
        let days = (end - start).num_days();
        if days < 1 {
            return None;
        }
        let duration = u32::try_from(days)
            .ok()
            .filter(|d| *d <= MAX_DURATION_DAYS)?;
        Some(Self::new(name, start, duration))
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.set_progress(progress);
        self
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Derived end date (`start + duration` days), saturating at the last
    /// representable date.
    pub fn end(&self) -> NaiveDate {
        self.checked_end().unwrap_or(NaiveDate::MAX)
    }

    /// `start + duration` days, or `None` past the end of the calendar.
    pub fn checked_end(&self) -> Option<NaiveDate> {
        self.start
            .checked_add_days(Days::new(u64::from(self.duration)))
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }

    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration.clamp(1, MAX_DURATION_DAYS);
    }

    /// Move the end date by changing the duration. Rejected unless the new
    /// end falls strictly after the start.
    pub fn set_end(&mut self, end: NaiveDate) -> bool {
        let days = (end - self.start).num_days();
        match u32::try_from(days) {
            Ok(d) if (1..=MAX_DURATION_DAYS).contains(&d) => {
                self.duration = d;
                true
            }
            _ => false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn end_is_derived_from_duration() {
        let mut task = ProjectTask::new("Design", d(2024, 1, 1), 5);
        assert_eq!(task.end(), d(2024, 1, 6));
        task.start = d(2024, 1, 10);
        assert_eq!(task.end(), d(2024, 1, 15));
    }

    #[test]
    fn zero_duration_is_bumped() {
        let task = ProjectTask::new("Kickoff", d(2024, 1, 1), 0);
        assert_eq!(task.duration(), 1);
    }

    #[test]
    fn set_end_rejects_non_positive_spans() {
        let mut task = ProjectTask::new("Build", d(2024, 3, 1), 4);
        assert!(!task.set_end(d(2024, 3, 1)));
        assert!(!task.set_end(d(2024, 2, 20)));
        assert_eq!(task.duration(), 4);
        assert!(task.set_end(d(2024, 3, 11)));
        assert_eq!(task.duration(), 10);
    }

    #[test]
    fn spanning_requires_end_after_start() {
        assert!(ProjectTask::spanning("x", d(2024, 1, 5), d(2024, 1, 5)).is_none());
        let t = ProjectTask::spanning("x", d(2024, 1, 5), d(2024, 1, 8)).unwrap();
        assert_eq!(t.duration(), 3);
    }

    #[test]
    fn progress_is_capped() {
        let task = ProjectTask::new("QA", d(2024, 1, 1), 2).with_progress(250);
        assert_eq!(task.progress(), 100);
    }

    #[test]
    fn duration_is_capped_and_end_never_overflows() {
        let mut task = ProjectTask::new("Forever", d(2024, 1, 1), 4_000_000_000);
        assert_eq!(task.duration(), MAX_DURATION_DAYS);
        assert!(task.end() > task.start);

        task.set_duration(u32::MAX);
        assert_eq!(task.duration(), MAX_DURATION_DAYS);
        assert!(!task.set_end(NaiveDate::MAX));

        task.start = NaiveDate::MAX;
        assert_eq!(task.checked_end(), None);
        assert_eq!(task.end(), NaiveDate::MAX);
    }

    #[test]
    fn progress_above_100_is_capped_on_deserialize() {
        let json = r#"{
            "id": "6f1c8a2e-6a4e-4a1b-9d7e-2b1f0c9d8e7a",
            "name": "Overdone",
            "start": "2024-01-01",
            "duration": 3,
            "progress": 250
        }"#;
        let task: ProjectTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.progress(), 100);

        let task: ProjectTask =
            serde_json::from_str(&json.replace("250", "4000")).unwrap();
        assert_eq!(task.progress(), 100);
    }

    #[test]
    fn status_parses_wire_names_and_aliases() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("On Hold".parse::<TaskStatus>(), Ok(TaskStatus::OnHold));
        assert_eq!("done".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("sleeping".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
    }
}
