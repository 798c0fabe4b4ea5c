pub mod project;
pub mod task;
pub mod timeline;

pub use project::Project;
pub use task::{
    DependencyKind, ProjectDependency, ProjectTask, TaskPriority, TaskStatus, MAX_DURATION_DAYS,
};
pub use timeline::{Timeline, ViewportState, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
