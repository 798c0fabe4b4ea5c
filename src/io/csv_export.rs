use std::io::Write;
use std::path::Path;

use crate::error::{GanttError, Result};
use crate::model::ProjectTask;

const HEADER: [&str; 8] = [
    "Name", "Start", "End", "Duration", "Status", "Priority", "Assignee", "Progress",
];

/// Export tasks as semicolon-delimited CSV that [`super::import_csv`] reads back.
///
/// Dates are written as `YYYY-MM-DD`; the end date is informational, the
/// duration column is authoritative on import. Returns the number of tasks
/// written.
pub fn export_csv(tasks: &[ProjectTask], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|e| GanttError::io(path, e))?;
    let count = write_csv(tasks, file)?;
    tracing::info!(path = %path.display(), count, "CSV exported");
    Ok(count)
}

/// Write tasks as CSV to any writer.
pub fn write_csv<W: Write>(tasks: &[ProjectTask], writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;

    for task in tasks {
        let row: [String; 8] = [
            task.name.clone(),
            task.start.format("%Y-%m-%d").to_string(),
            task.end().format("%Y-%m-%d").to_string(),
            task.duration().to_string(),
            task.status.as_str().to_string(),
            task.priority.as_str().to_string(),
            task.assignee.clone().unwrap_or_default(),
            task.progress().to_string(),
        ];
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(|e| GanttError::Csv(e.into()))?;
    Ok(tasks.len())
}
