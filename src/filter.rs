//! Visible-task derivation from the chart's filter controls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{ProjectTask, TaskPriority, TaskStatus};

/// A filter control value: either the `"all"` sentinel or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(v) => v.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

/// Independent filter controls, combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub show_completed: bool,
    pub status: Selection<TaskStatus>,
    pub priority: Selection<TaskPriority>,
    pub assignee: Selection<String>,
    /// Case-insensitive substring of the task name; empty matches everything.
    pub search: String,
    /// Rendering toggle for dependency edges. Does not affect visibility.
    pub show_dependencies: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_completed: true,
            status: Selection::All,
            priority: Selection::All,
            assignee: Selection::All,
            search: String::new(),
            show_dependencies: true,
        }
    }
}

impl FilterState {
    /// Whether a single task passes every filter.
    pub fn matches(&self, task: &ProjectTask) -> bool {
        if !self.show_completed && task.is_completed() {
            return false;
        }
        if !self.status.admits(&task.status) {
            return false;
        }
        if !self.priority.admits(&task.priority) {
            return false;
        }
        if let Selection::Only(who) = &self.assignee {
            if task.assignee.as_deref() != Some(who.as_str()) {
                return false;
            }
        }
        let query = self.search.trim();
        query.is_empty() || task.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// True when no filter would drop anything.
    pub fn is_pass_through(&self) -> bool {
        self.show_completed
            && self.status.is_all()
            && self.priority.is_all()
            && self.assignee.is_all()
            && self.search.trim().is_empty()
    }
}

/// Ordered subset of `tasks` that passes `filters`. Input order is kept.
pub fn visible<'a>(tasks: &'a [ProjectTask], filters: &FilterState) -> Vec<&'a ProjectTask> {
    tasks.iter().filter(|t| filters.matches(t)).collect()
}

/// Distinct assignees in first-seen order, for populating a picker.
pub fn assignees(tasks: &[ProjectTask]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in tasks.iter().filter_map(|t| t.assignee.as_ref()) {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tasks() -> Vec<ProjectTask> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        vec![
            ProjectTask::new("Design API", start, 3)
                .with_status(TaskStatus::Completed)
                .with_assignee("ana"),
            ProjectTask::new("Build API", start, 5)
                .with_status(TaskStatus::InProgress)
                .with_priority(TaskPriority::High)
                .with_assignee("bo"),
            ProjectTask::new("Write docs", start, 2).with_assignee("ana"),
            ProjectTask::new("Load test", start, 2)
                .with_status(TaskStatus::Blocked)
                .with_priority(TaskPriority::High),
        ]
    }

    fn names(v: &[&ProjectTask]) -> Vec<String> {
        v.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn default_filters_pass_everything() {
        let tasks = tasks();
        assert_eq!(visible(&tasks, &FilterState::default()).len(), 4);
        assert!(FilterState::default().is_pass_through());
    }

    #[test]
    fn hides_completed() {
        let tasks = tasks();
        let f = FilterState {
            show_completed: false,
            ..Default::default()
        };
        assert_eq!(
            names(&visible(&tasks, &f)),
            vec!["Build API", "Write docs", "Load test"]
        );
    }

    #[test]
    fn filters_combine_with_and() {
        let tasks = tasks();
        let f = FilterState {
            priority: Selection::Only(TaskPriority::High),
            status: Selection::Only(TaskStatus::Blocked),
            ..Default::default()
        };
        assert_eq!(names(&visible(&tasks, &f)), vec!["Load test"]);
    }

    #[test]
    fn assignee_and_search() {
        let tasks = tasks();
        let f = FilterState {
            assignee: Selection::Only("ana".to_string()),
            search: "DOCS".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&visible(&tasks, &f)), vec!["Write docs"]);
    }

    #[test]
    fn selection_parses_all_sentinel() {
        assert_eq!("all".parse::<Selection<TaskStatus>>(), Ok(Selection::All));
        assert_eq!(
            "blocked".parse::<Selection<TaskStatus>>(),
            Ok(Selection::Only(TaskStatus::Blocked))
        );
        assert_eq!(Selection::<TaskPriority>::All.to_string(), "all");
    }

    #[test]
    fn assignee_list_is_distinct() {
        assert_eq!(assignees(&tasks()), vec!["ana", "bo"]);
    }
}
