//! Framework-free chart surface.
//!
//! [`ChartSession`] owns the per-surface interaction state (viewport, drag
//! interpreter, filters) and turns input events into [`ChartEvent`]s on its
//! bus. A renderer only has to forward pointer positions and draw what the
//! geometry helpers return.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::ChartConfig;
use crate::drag::{DragInterpreter, DragRejected, DragType};
use crate::events::{ChartEvent, EventBus, ExportFormat};
use crate::filter::{self, FilterState};
use crate::model::{ProjectTask, ViewportState};
use crate::projection::ChartGeometry;

#[derive(Debug, Default)]
pub struct ChartSession {
    config: ChartConfig,
    viewport: ViewportState,
    drag: DragInterpreter,
    pub filters: FilterState,
    selected: Option<Uuid>,
    bus: EventBus,
}

impl ChartSession {
    /// Out-of-range config values fall back to their defaults.
    pub fn new(config: ChartConfig) -> Self {
        let config = config.sanitized();
        let filters = FilterState {
            show_dependencies: config.show_dependencies,
            ..Default::default()
        };
        Self {
            config,
            filters,
            ..Default::default()
        }
    }

    pub fn with_bus(config: ChartConfig, bus: EventBus) -> Self {
        Self {
            bus,
            ..Self::new(config)
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn drag(&self) -> &DragInterpreter {
        &self.drag
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Geometry for the current frame.
    pub fn geometry(&self, timeline_start: NaiveDate) -> ChartGeometry {
        ChartGeometry {
            timeline_start,
            zoom_level: self.viewport.zoom_level(),
            day_width_px: self.config.day_width_px,
            rows: self.config.rows,
        }
    }

    /// Tasks that pass the current filters, in input order.
    pub fn visible<'a>(&self, tasks: &'a [ProjectTask]) -> Vec<&'a ProjectTask> {
        filter::visible(tasks, &self.filters)
    }

    // --- Pointer handling ---

    /// Begin dragging `task`. A press on a task also selects it.
    pub fn pointer_down(
        &mut self,
        task: &ProjectTask,
        drag_type: DragType,
        pointer_x: f32,
        pointer_y: f32,
    ) -> Result<(), DragRejected> {
        self.drag.pointer_down(task, drag_type, pointer_x, pointer_y)?;
        self.select(task.id);
        Ok(())
    }

    /// Feed a pointer-move. Every accepted frame publishes the updated task,
    /// even when it landed on the same day as the previous frame.
    pub fn pointer_move(&mut self, tasks: &[ProjectTask], pointer_x: f32) -> Option<ProjectTask> {
        let task_id = self.drag.active_task()?;
        let task = tasks.iter().find(|t| t.id == task_id)?;
        let updated = self.drag.pointer_move(
            task,
            pointer_x,
            self.viewport.zoom_level(),
            self.config.day_width_px,
        )?;
        self.bus.publish(ChartEvent::TaskUpdated(updated.clone()));
        Some(updated)
    }

    pub fn pointer_up(&mut self) {
        if let Some(id) = self.drag.pointer_up() {
            self.bus.publish(ChartEvent::DragFinished(id));
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(id) = self.drag.pointer_leave() {
            self.bus.publish(ChartEvent::DragFinished(id));
        }
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) {
        let target = self.viewport.zoom_level() * self.config.zoom_step;
        self.set_zoom(target);
    }

    pub fn zoom_out(&mut self) {
        let target = self.viewport.zoom_level() / self.config.zoom_step;
        self.set_zoom(target);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let before = self.viewport;
        self.viewport
            .set_zoom(zoom.clamp(self.config.min_zoom, self.config.max_zoom));
        self.publish_viewport_if_changed(before);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let before = self.viewport;
        self.viewport.pan_by(dx, dy);
        self.publish_viewport_if_changed(before);
    }

    pub fn reset_view(&mut self) {
        let before = self.viewport;
        self.viewport.reset();
        self.publish_viewport_if_changed(before);
    }

    fn publish_viewport_if_changed(&self, before: ViewportState) {
        if before != self.viewport {
            self.bus.publish(ChartEvent::ViewportChanged(self.viewport));
        }
    }

    // --- Intents ---

    pub fn select(&mut self, task_id: Uuid) {
        if self.selected != Some(task_id) {
            self.selected = Some(task_id);
            self.bus.publish(ChartEvent::TaskSelected(task_id));
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.bus.publish(ChartEvent::SelectionCleared);
        }
    }

    pub fn request_edit(&self, task_id: Uuid) {
        self.bus.publish(ChartEvent::EditRequested(task_id));
    }

    pub fn request_delete(&mut self, task_id: Uuid) {
        if self.selected == Some(task_id) {
            self.clear_selection();
        }
        self.bus.publish(ChartEvent::DeleteRequested(task_id));
    }

    pub fn request_export(&self, format: ExportFormat) {
        self.bus.publish(ChartEvent::ExportRequested(format));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventCategory, EventFilter};

    fn task() -> ProjectTask {
        ProjectTask::new("Ship", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5)
    }

    #[test]
    fn drag_publishes_whole_task_each_accepted_frame() {
        let mut session = ChartSession::new(ChartConfig::default());
        let (_, queue) = session
            .bus()
            .subscribe_queue(EventFilter::Categories(vec![EventCategory::Mutation]));

        let mut tasks = vec![task()];
        session.pointer_down(&tasks[0], DragType::Move, 0.0, 0.0).unwrap();

        let first = session.pointer_move(&tasks, 120.0).unwrap();
        tasks[0] = first.clone();
        let second = session.pointer_move(&tasks, 240.0).unwrap();
        session.pointer_up();

        let events = queue.drain();
        assert_eq!(
            events,
            vec![
                ChartEvent::TaskUpdated(first),
                ChartEvent::TaskUpdated(second),
                ChartEvent::DragFinished(tasks[0].id),
            ]
        );
    }

    #[test]
    fn rejected_frames_publish_nothing() {
        let mut session = ChartSession::new(ChartConfig::default());
        let (_, queue) = session
            .bus()
            .subscribe_queue(EventFilter::Categories(vec![EventCategory::Mutation]));
        let tasks = vec![task()];
        session
            .pointer_down(&tasks[0], DragType::ResizeEnd, 0.0, 0.0)
            .unwrap();
        assert!(session.pointer_move(&tasks, -5.0 * 120.0).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn zoom_respects_configured_range() {
        let config = ChartConfig {
            max_zoom: 2.0,
            ..Default::default()
        };
        let mut session = ChartSession::new(config);
        let (_, queue) = session
            .bus()
            .subscribe_queue(EventFilter::Categories(vec![EventCategory::View]));

        session.set_zoom(3.0);
        assert_eq!(session.viewport().zoom_level(), 2.0);
        session.set_zoom(3.0);
        assert_eq!(queue.len(), 1);

        session.reset_view();
        assert_eq!(session.viewport().zoom_level(), 1.0);
    }

    #[test]
    fn inverted_zoom_bounds_fall_back_to_defaults() {
        let config = ChartConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            zoom_step: 0.5,
            day_width_px: 0.0,
            ..Default::default()
        };
        let mut session = ChartSession::new(config);
        let defaults = ChartConfig::default();
        assert_eq!(session.config().min_zoom, defaults.min_zoom);
        assert_eq!(session.config().max_zoom, defaults.max_zoom);
        assert_eq!(session.config().zoom_step, defaults.zoom_step);
        assert_eq!(session.config().day_width_px, defaults.day_width_px);

        session.zoom_in();
        assert!(session.viewport().zoom_level() > 1.0);

        let nan = ChartConfig {
            min_zoom: f32::NAN,
            ..Default::default()
        };
        let mut session = ChartSession::with_bus(nan, EventBus::new());
        session.zoom_out();
        assert!(session.viewport().zoom_level() < 1.0);
    }

    #[test]
    fn selection_events_are_deduplicated() {
        let mut session = ChartSession::new(ChartConfig::default());
        let (_, queue) = session.bus().subscribe_queue(EventFilter::All);
        let id = Uuid::new_v4();
        session.select(id);
        session.select(id);
        session.request_delete(id);
        session.clear_selection();
        assert_eq!(
            queue.drain(),
            vec![
                ChartEvent::TaskSelected(id),
                ChartEvent::SelectionCleared,
                ChartEvent::DeleteRequested(id),
            ]
        );
    }
}
