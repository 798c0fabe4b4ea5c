use std::path::Path;

use chrono::NaiveDate;

use crate::error::{GanttError, Result};
use crate::model::{ProjectTask, TaskPriority, TaskStatus, MAX_DURATION_DAYS};

/// Outcome of a CSV import.
#[derive(Debug, Clone)]
pub struct CsvImport {
    pub tasks: Vec<ProjectTask>,
    /// Rows that were rejected (no name, bad dates, unreadable record).
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Start,
    End,
    Duration,
    Status,
    Priority,
    Assignee,
    Progress,
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Map a header to a column, ignoring case, spaces, dashes and underscores.
fn header_to_col(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "duration" | "days" | "durationdays" | "length" => Some(Column::Duration),
        "status" | "state" | "stage" => Some(Column::Status),
        "priority" | "pri" | "importance" => Some(Column::Priority),
        "assignee" | "assignedto" | "owner" | "resource" => Some(Column::Assignee),
        "progress" | "percentcomplete" | "complete" | "done" => Some(Column::Progress),
        _ => None,
    }
}

fn parse_progress(s: &str) -> Option<u8> {
    let value: f32 = s.trim().trim_end_matches('%').trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 100.0) as u8)
}

/// Import tasks from a CSV file.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column headers
/// flexibly (e.g. "Task Label", "Start Date", "Assigned To").
pub fn import_csv(path: &Path) -> Result<CsvImport> {
    let content = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    let import = import_csv_str(&content)?;
    tracing::info!(
        path = %path.display(),
        tasks = import.tasks.len(),
        skipped = import.skipped,
        "CSV imported"
    );
    Ok(import)
}

/// Import tasks from CSV text. See [`import_csv`].
pub fn import_csv_str(content: &str) -> Result<CsvImport> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers.iter().map(header_to_col).collect();
    let has = |c: Column| col_map.contains(&Some(c));

    if !has(Column::Name) || !has(Column::Start) || !(has(Column::End) || has(Column::Duration)) {
        return Err(GanttError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping CSV row {}: {}", row, e);
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| -> Option<&str> {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
                .filter(|v| !v.is_empty())
        };

        let Some(name) = field(Column::Name) else {
            skipped += 1;
            continue;
        };

        let Some(start) = field(Column::Start).and_then(parse_date) else {
            tracing::warn!(
                "Skipping row {}: invalid start date '{}'",
                row,
                field(Column::Start).unwrap_or("")
            );
            skipped += 1;
            continue;
        };

        // An explicit duration wins; otherwise derive it from the end date.
        let duration = match field(Column::Duration).and_then(|s| s.parse::<u32>().ok()) {
            Some(days) => days,
            None => match field(Column::End).and_then(parse_date) {
                Some(end) => u32::try_from((end - start).num_days()).unwrap_or(0),
                None => {
                    tracing::warn!("Skipping row {}: no usable end date or duration", row);
                    skipped += 1;
                    continue;
                }
            },
        };

        if duration > MAX_DURATION_DAYS {
            tracing::warn!("Skipping row {}: duration of {} days is too long", row, duration);
            skipped += 1;
            continue;
        }

        let status = field(Column::Status)
            .map(|s| {
                s.parse::<TaskStatus>().unwrap_or_else(|e| {
                    tracing::debug!("row {}: {}, using default", row, e);
                    TaskStatus::default()
                })
            })
            .unwrap_or_default();

        let priority = field(Column::Priority)
            .and_then(|s| s.parse::<TaskPriority>().ok())
            .unwrap_or_default();

        let progress = field(Column::Progress)
            .and_then(parse_progress)
            .unwrap_or(if status == TaskStatus::Completed { 100 } else { 0 });

        let mut task = ProjectTask::new(name, start, duration)
            .with_status(status)
            .with_priority(priority)
            .with_progress(progress);
        task.assignee = field(Column::Assignee).map(str::to_string);
        if task.checked_end().is_none() {
            tracing::warn!("Skipping row {}: end date falls outside the calendar", row);
            skipped += 1;
            continue;
        }
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(GanttError::NoValidRows { skipped });
    }

    Ok(CsvImport { tasks, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_delimiters() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    }

    #[test]
    fn headers_are_matched_loosely() {
        assert_eq!(header_to_col("Task Label"), Some(Column::Name));
        assert_eq!(header_to_col("start_date"), Some(Column::Start));
        assert_eq!(header_to_col("Assigned-To"), Some(Column::Assignee));
        assert_eq!(header_to_col("colour"), None);
    }

    #[test]
    fn progress_accepts_percent_suffix() {
        assert_eq!(parse_progress("40%"), Some(40));
        assert_eq!(parse_progress("140"), Some(100));
        assert_eq!(parse_progress("lots"), None);
    }

    #[test]
    fn end_dates_become_durations() {
        let csv = "Task Label;Start Date;End Date;Status\n\
                   Kickoff;01/02/2024;05/02/2024;done\n\
                   Same day;01/02/2024;01/02/2024;new\n";
        let import = import_csv_str(csv).unwrap();
        assert_eq!(import.skipped, 0);
        assert_eq!(import.tasks[0].duration(), 4);
        assert_eq!(import.tasks[0].status, TaskStatus::Completed);
        assert_eq!(import.tasks[0].progress(), 100);
        assert_eq!(import.tasks[1].duration(), 1);
    }

    #[test]
    fn bad_rows_are_counted() {
        let csv = "name,start,duration\nok,2024-01-01,3\n,2024-01-01,2\nbad,yesterday,2\n";
        let import = import_csv_str(csv).unwrap();
        assert_eq!(import.tasks.len(), 1);
        assert_eq!(import.skipped, 2);
    }

    #[test]
    fn overlong_durations_are_skipped() {
        let csv = "name;start;duration\nx;2024-01-01;4000000000\ny;2024-01-01;3\n";
        let import = import_csv_str(csv).unwrap();
        assert_eq!(import.skipped, 1);
        assert_eq!(import.tasks.len(), 1);
        assert_eq!(import.tasks[0].name, "y");

        // Nothing panics downstream of the import
        let summary = crate::metrics::summarize(&import.tasks, &[]);
        assert_eq!(summary.total_tasks, 1);
    }

    #[test]
    fn missing_columns_is_an_error() {
        let err = import_csv_str("name,owner\na,b\n").unwrap_err();
        assert!(matches!(err, GanttError::MissingColumns { .. }));
    }

    #[test]
    fn all_rows_bad_is_an_error() {
        let err = import_csv_str("name,start,end\nx,never,never\n").unwrap_err();
        assert!(matches!(err, GanttError::NoValidRows { skipped: 1 }));
    }
}
