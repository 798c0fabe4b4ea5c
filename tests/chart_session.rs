//! A host applying chart events to its own project, the way the viewer does.

use chrono::NaiveDate;
use gantt_geometry::config::ChartConfig;
use gantt_geometry::drag::DragType;
use gantt_geometry::events::{ChartEvent, EventFilter, EventQueue};
use gantt_geometry::model::{Project, ProjectDependency, ProjectTask};
use gantt_geometry::ChartSession;

fn apply(project: &mut Project, queue: &EventQueue) -> usize {
    let mut applied = 0;
    for event in queue.drain() {
        match event {
            ChartEvent::TaskUpdated(task) => {
                assert!(project.replace_task(task));
                applied += 1;
            }
            ChartEvent::DeleteRequested(id) => {
                project.remove_task(id);
                applied += 1;
            }
            _ => {}
        }
    }
    applied
}

fn project() -> Project {
    let start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
    let mut project = Project::new("Host");
    let a = ProjectTask::new("Foundations", start, 4);
    let b = ProjectTask::new("Walls", start + chrono::Duration::days(4), 6);
    let link = ProjectDependency::finish_to_start(a.id, b.id);
    project.add_task(a);
    project.add_task(b);
    project.add_dependency(link);
    project
}

#[test]
fn test_drag_round_trip_through_host() {
    let mut project = project();
    let mut session = ChartSession::new(ChartConfig::default());
    let (_, queue) = session.bus().subscribe_queue(EventFilter::All);
    let walls = project.tasks[1].clone();

    session
        .pointer_down(&walls, DragType::ResizeEnd, 300.0, 50.0)
        .unwrap();
    // Host applies each frame before the next pointer-move arrives
    for x in [420.0, 540.0, 660.0] {
        session.pointer_move(&project.tasks, x);
        apply(&mut project, &queue);
    }
    session.pointer_up();
    apply(&mut project, &queue);

    let updated = project.task(walls.id).unwrap();
    assert_eq!(updated.start, walls.start);
    assert_eq!(updated.duration(), walls.duration() + 3);
    assert_eq!(session.selected(), Some(walls.id));
    assert!(!session.drag().is_dragging());
}

#[test]
fn test_second_press_during_drag_is_rejected() {
    let project = project();
    let mut session = ChartSession::new(ChartConfig::default());

    session
        .pointer_down(&project.tasks[0], DragType::Move, 0.0, 0.0)
        .unwrap();
    let err = session
        .pointer_down(&project.tasks[1], DragType::Move, 10.0, 0.0)
        .unwrap_err();
    assert_eq!(err.active, project.tasks[0].id);
    assert_eq!(session.drag().active_task(), Some(project.tasks[0].id));
}

#[test]
fn test_delete_request_removes_task_and_links() {
    let mut project = project();
    let mut session = ChartSession::new(ChartConfig::default());
    let (_, queue) = session.bus().subscribe_queue(EventFilter::All);
    let doomed = project.tasks[0].id;

    session.select(doomed);
    session.request_delete(doomed);
    assert_eq!(apply(&mut project, &queue), 1);

    assert!(project.task(doomed).is_none());
    assert!(project.dependencies.is_empty());
    assert_eq!(session.selected(), None);
}
