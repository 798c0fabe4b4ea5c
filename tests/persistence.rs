//! Project files and CSV interchange on disk.

use chrono::NaiveDate;
use gantt_geometry::io::{export_csv, import_csv, load_project, save_project};
use gantt_geometry::model::{Project, ProjectDependency, ProjectTask, TaskPriority, TaskStatus};
use tempfile::tempdir;

fn sample_project() -> Project {
    let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    let mut project = Project::new("Harbour");
    let dredge = ProjectTask::new("Dredge", start, 10)
        .with_status(TaskStatus::InProgress)
        .with_priority(TaskPriority::High)
        .with_assignee("Ines")
        .with_progress(35);
    let pier = ProjectTask::new("Pier", start + chrono::Duration::days(10), 15);
    let link = ProjectDependency::finish_to_start(dredge.id, pier.id);
    project.add_task(dredge);
    project.add_task(pier);
    assert!(project.add_dependency(link));
    project
}

#[test]
fn test_project_survives_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("harbour.gantt.json");
    let project = sample_project();

    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();

    assert_eq!(loaded.name, project.name);
    assert_eq!(loaded.tasks, project.tasks);
    assert_eq!(loaded.dependencies, project.dependencies);
}

#[test]
fn test_csv_export_reimports_schedule_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("harbour.csv");
    let project = sample_project();

    assert_eq!(export_csv(&project.tasks, &path).unwrap(), 2);
    let imported = import_csv(&path).unwrap();

    assert_eq!(imported.skipped, 0);
    assert_eq!(imported.tasks.len(), 2);
    for (original, back) in project.tasks.iter().zip(&imported.tasks) {
        assert_eq!(back.name, original.name);
        assert_eq!(back.start, original.start);
        assert_eq!(back.duration(), original.duration());
        assert_eq!(back.status, original.status);
        assert_eq!(back.priority, original.priority);
        assert_eq!(back.assignee, original.assignee);
        assert_eq!(back.progress(), original.progress());
    }
}
