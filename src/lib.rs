//! Gantt schedule geometry.
//!
//! Converts a project's task list and calendar dates into pixel geometry and
//! pointer drags back into calendar edits:
//!
//! - [`scale`]: pick day/week/month granularity for a date range
//! - [`projection`]: date-to-pixel mapping for bars and rows
//! - [`drag`]: move / resize state machine with the `start < end` guard
//! - [`routing`]: connector paths between dependent bars
//! - [`filter`]: visible subset from status/priority/assignee filters
//! - [`metrics`]: status counts, mean progress, critical path summary
//! - [`chart`]: a surface that ties the above to an [`events::EventBus`]
//!
//! Nothing here depends on a UI toolkit; the `viewer` feature builds an egui
//! front end on top.

pub mod chart;
pub mod config;
pub mod drag;
pub mod error;
pub mod events;
pub mod filter;
pub mod io;
pub mod metrics;
pub mod model;
pub mod projection;
pub mod routing;
pub mod scale;

pub use chart::ChartSession;
pub use error::{GanttError, Result};
pub use model::{Project, ProjectDependency, ProjectTask, TaskPriority, TaskStatus};

/// Install a `tracing` subscriber that honours `RUST_LOG` (default `info`).
///
/// Returns an error if a global subscriber was already set.
pub fn init_logging() -> std::result::Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}
