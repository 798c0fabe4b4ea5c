//! Connector paths between dependent task bars.

use uuid::Uuid;

use crate::model::{DependencyKind, ProjectDependency, ProjectTask};
use crate::projection::ChartGeometry;

/// A point in chart space (pixels from the timeline origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Quadratic connector from a predecessor to a successor.
///
/// Only the endpoints are load-bearing; the control point just bends the
/// curve so it leaves and enters the bars horizontally-ish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePath {
    pub from: Point,
    pub control: Point,
    pub to: Point,
}

impl EdgePath {
    fn between(from: Point, to: Point) -> Self {
        let control = Point::new(from.x + (to.x - from.x) / 2.0, from.y);
        Self { from, control, to }
    }

    /// Evaluate the curve at `segments + 1` evenly spaced parameters.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let mt = 1.0 - t;
                let a = mt * mt;
                let b = 2.0 * mt * t;
                let c = t * t;
                Point::new(
                    a * self.from.x + b * self.control.x + c * self.to.x,
                    a * self.from.y + b * self.control.y + c * self.to.y,
                )
            })
            .collect()
    }
}

/// Route one dependency.
///
/// `index_of` maps a task id to its display row; tasks that are missing
/// from `tasks` or have no row produce `None` and the edge is not drawn.
pub fn route<F>(
    dependency: &ProjectDependency,
    tasks: &[ProjectTask],
    index_of: F,
    geometry: &ChartGeometry,
) -> Option<EdgePath>
where
    F: Fn(Uuid) -> Option<usize>,
{
    let from_task = tasks.iter().find(|t| t.id == dependency.from_task)?;
    let to_task = tasks.iter().find(|t| t.id == dependency.to_task)?;
    let from_row = index_of(from_task.id)?;
    let to_row = index_of(to_task.id)?;

    let from_bar = geometry.bar(from_task);
    let to_bar = geometry.bar(to_task);

    let (from_x, to_x) = match dependency.kind {
        DependencyKind::FinishToStart => (from_bar.end_x(), to_bar.x_offset),
        DependencyKind::StartToStart => (from_bar.x_offset, to_bar.x_offset),
        DependencyKind::FinishToFinish => (from_bar.end_x(), to_bar.end_x()),
        DependencyKind::StartToFinish => (from_bar.x_offset, to_bar.end_x()),
    };

    Some(EdgePath::between(
        Point::new(from_x, geometry.rows.row_center_y(from_row)),
        Point::new(to_x, geometry.rows.row_center_y(to_row)),
    ))
}

/// Route every dependency whose endpoints both resolve, using list position
/// in `tasks` as the row index.
pub fn route_all<'a>(
    dependencies: &'a [ProjectDependency],
    tasks: &[ProjectTask],
    geometry: &ChartGeometry,
) -> Vec<(&'a ProjectDependency, EdgePath)> {
    let index_of = |id: Uuid| tasks.iter().position(|t| t.id == id);
    dependencies
        .iter()
        .filter_map(|dep| route(dep, tasks, index_of, geometry).map(|path| (dep, path)))
        .collect()
}
