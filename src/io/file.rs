use std::path::Path;

use crate::error::{GanttError, Result};
use crate::metrics::CriticalPathEntry;
use crate::model::{Project, MAX_DURATION_DAYS};

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json).map_err(|e| GanttError::io(path, e))?;
    tracing::info!(path = %path.display(), tasks = project.tasks.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    let project: Project = serde_json::from_str(&json)?;

    for task in &project.tasks {
        let reason = if task.duration() == 0 {
            "duration must be at least one day"
        } else if task.duration() > MAX_DURATION_DAYS {
            "duration exceeds the supported maximum"
        } else if task.checked_end().is_none() {
            "end date falls outside the calendar"
        } else {
            continue;
        };
        return Err(GanttError::InvalidTask {
            name: task.name.clone(),
            reason: reason.to_string(),
        });
    }

    let dangling = project
        .dependencies
        .iter()
        .filter(|d| project.task(d.from_task).is_none() || project.task(d.to_task).is_none())
        .count();
    if dangling > 0 {
        tracing::warn!(dangling, "project has dependencies referencing missing tasks");
    }

    tracing::info!(path = %path.display(), tasks = project.tasks.len(), "project loaded");
    Ok(project)
}

/// Read a critical path produced by an external scheduler: a JSON array of
/// `{"taskId": ..., "isCritical": ...}` objects.
pub fn load_critical_path(path: &Path) -> Result<Vec<CriticalPathEntry>> {
    let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    let entries: Vec<CriticalPathEntry> = serde_json::from_str(&json)?;
    tracing::debug!(
        path = %path.display(),
        entries = entries.len(),
        critical = entries.iter().filter(|e| e.is_critical).count(),
        "critical path loaded"
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gantt.json");
        let json = r#"{
            "name": "Bad",
            "tasks": [{
                "id": "6f1c8a2e-6a4e-4a1b-9d7e-2b1f0c9d8e7a",
                "name": "Nothing",
                "start": "2024-01-01",
                "duration": 0
            }],
            "dependencies": [],
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        }"#;
        std::fs::write(&path, json).unwrap();
        assert!(matches!(
            load_project(&path),
            Err(GanttError::InvalidTask { .. })
        ));
    }

    fn write_single_task(dir: &Path, task_fields: &str) -> std::path::PathBuf {
        let path = dir.join("one.gantt.json");
        let json = format!(
            r#"{{
                "name": "One",
                "tasks": [{{
                    "id": "6f1c8a2e-6a4e-4a1b-9d7e-2b1f0c9d8e7a",
                    "name": "Only",
                    {}
                }}],
                "dependencies": [],
                "created": "2024-01-01T00:00:00Z",
                "modified": "2024-01-01T00:00:00Z"
            }}"#,
            task_fields
        );
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn oversized_duration_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_single_task(dir.path(), r#""start": "2024-01-01", "duration": 4000000000"#);
        let err = load_project(&path).unwrap_err();
        assert!(matches!(err, GanttError::InvalidTask { .. }));
        assert!(err.to_string().contains("maximum"));
    }

    #[test]
    fn progress_over_100_loads_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_single_task(
            dir.path(),
            r#""start": "2024-01-01", "duration": 4, "progress": 250"#,
        );
        let project = load_project(&path).unwrap();
        assert_eq!(project.tasks[0].progress(), 100);
        let summary = crate::metrics::summarize(&project.tasks, &[]);
        assert_eq!(summary.actual_progress, 100.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_project(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("not/here.json"));
    }

    #[test]
    fn critical_path_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("critical.json");
        std::fs::write(
            &path,
            r#"[{"taskId": "6f1c8a2e-6a4e-4a1b-9d7e-2b1f0c9d8e7a", "isCritical": true}]"#,
        )
        .unwrap();
        let entries = load_critical_path(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_critical);
    }
}
