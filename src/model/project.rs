use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{ProjectDependency, ProjectTask};
use super::timeline::Timeline;

/// A Gantt project containing tasks, dependencies, and metadata.
///
/// This is the host-side canonical task list. The chart never patches it in
/// place; it emits whole replacement tasks that are merged with
/// [`Project::replace_task`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<ProjectTask>,
    pub dependencies: Vec<ProjectDependency>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            tasks: Vec::new(),
            dependencies: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: Uuid) -> Option<&ProjectTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Row index of a task in display order.
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Merge a whole updated task record. Returns false if the id is unknown.
    pub fn replace_task(&mut self, updated: ProjectTask) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn add_task(&mut self, task: ProjectTask) {
        self.tasks.push(task);
        self.touch();
    }

    /// Remove a task and every dependency that references it.
    pub fn remove_task(&mut self, id: Uuid) -> Option<ProjectTask> {
        let idx = self.index_of(id)?;
        let removed = self.tasks.remove(idx);
        self.dependencies.retain(|d| !d.touches(id));
        self.touch();
        Some(removed)
    }

    /// Add a dependency if both ends exist, it is not a self link and it is
    /// not already present.
    pub fn add_dependency(&mut self, dep: ProjectDependency) -> bool {
        if dep.from_task == dep.to_task
            || self.task(dep.from_task).is_none()
            || self.task(dep.to_task).is_none()
        {
            return false;
        }
        let exists = self
            .dependencies
            .iter()
            .any(|d| d.from_task == dep.from_task && d.to_task == dep.to_task);
        if exists {
            return false;
        }
        self.dependencies.push(dep);
        self.touch();
        true
    }

    /// Date range bounding every task, if there are any.
    pub fn timeline(&self) -> Option<Timeline> {
        Timeline::from_tasks(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn replace_task_swaps_whole_record() {
        let mut project = Project::new("Demo");
        let task = ProjectTask::new("Write", d(1), 3);
        let id = task.id;
        project.add_task(task.clone());

        let mut moved = task;
        moved.start = d(4);
        assert!(project.replace_task(moved));
        assert_eq!(project.task(id).unwrap().start, d(4));

        let stranger = ProjectTask::new("Other", d(1), 1);
        assert!(!project.replace_task(stranger));
    }

    #[test]
    fn remove_task_drops_its_dependencies() {
        let mut project = Project::new("Demo");
        let a = ProjectTask::new("A", d(1), 2);
        let b = ProjectTask::new("B", d(3), 2);
        let (a_id, b_id) = (a.id, b.id);
        project.add_task(a);
        project.add_task(b);
        assert!(project.add_dependency(ProjectDependency::finish_to_start(a_id, b_id)));

        project.remove_task(a_id);
        assert!(project.dependencies.is_empty());
        assert_eq!(project.tasks.len(), 1);
    }

    #[test]
    fn add_dependency_rejects_duplicates_and_self_links() {
        let mut project = Project::new("Demo");
        let a = ProjectTask::new("A", d(1), 2);
        let b = ProjectTask::new("B", d(3), 2);
        let (a_id, b_id) = (a.id, b.id);
        project.add_task(a);
        project.add_task(b);

        assert!(project.add_dependency(ProjectDependency::finish_to_start(a_id, b_id)));
        assert!(!project.add_dependency(ProjectDependency::finish_to_start(a_id, b_id)));
        assert!(!project.add_dependency(ProjectDependency::finish_to_start(a_id, a_id)));
        assert!(!project.add_dependency(ProjectDependency::finish_to_start(a_id, Uuid::new_v4())));
    }
}
