use chrono::{Datelike, NaiveDate};
use egui::epaint::QuadraticBezierShape;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use gantt_geometry::drag::DragType;
use gantt_geometry::metrics::CriticalPath;
use gantt_geometry::model::{ProjectDependency, ProjectTask, Timeline};
use gantt_geometry::projection::ChartGeometry;
use gantt_geometry::routing::{self, EdgePath, Point};
use gantt_geometry::scale::{self, ScaleUnit};
use gantt_geometry::ChartSession;
use uuid::Uuid;

use crate::ui::theme;

/// Render the Gantt chart area (central panel).
///
/// All edits leave through the session's event bus; nothing here mutates
/// the task list.
pub fn show_gantt_chart(
    session: &mut ChartSession,
    tasks: &[ProjectTask],
    dependencies: &[ProjectDependency],
    timeline: Timeline,
    critical: &CriticalPath,
    ui: &mut Ui,
) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
    let canvas = response.rect;

    handle_zoom_and_pan(session, canvas, ui);

    let geometry = session.geometry(timeline.start);
    let (pan_x, pan_y) = session.viewport().pan_offset;
    let origin = Pos2::new(canvas.left() + pan_x, canvas.top() + pan_y);
    let visible = session.visible(tasks);
    let rows = geometry.rows;
    let header_bottom = canvas.top() + rows.header_height;

    painter.rect_filled(canvas, 0.0, theme::BG_DARK);

    // Alternating row backgrounds
    for i in 0..visible.len() {
        let y = origin.y + rows.row_top(i);
        let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
        painter.rect_filled(
            Rect::from_min_size(
                Pos2::new(canvas.left(), y),
                Vec2::new(canvas.width(), rows.row_height + rows.row_gap),
            ),
            0.0,
            row_bg,
        );
    }

    let scale = scale::select_scale(timeline.start, timeline.end);
    let ticks = scale::ticks(&timeline, &scale);
    for &tick in &ticks {
        let x = origin.x + geometry.date_x(tick);
        painter.line_segment(
            [Pos2::new(x, header_bottom), Pos2::new(x, canvas.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }

    draw_today_line(&painter, origin, &geometry, canvas, header_bottom);

    if session.filters.show_dependencies {
        let index_of = |id: Uuid| visible.iter().position(|t| t.id == id);
        for dep in dependencies {
            if let Some(path) = routing::route(dep, tasks, index_of, &geometry) {
                let on_critical_path =
                    critical.is_critical(dep.from_task) && critical.is_critical(dep.to_task);
                let color = if on_critical_path {
                    theme::CRITICAL
                } else {
                    theme::DEPENDENCY
                };
                draw_dependency(&painter, origin, &path, color);
            }
        }
    }

    let mut consumed_click = false;

    for (row, task) in visible.iter().copied().enumerate() {
        let bar = geometry.bar(task);
        let top = origin.y + rows.row_top(row) + rows.row_gap;
        let bar_rect = Rect::from_min_size(
            Pos2::new(origin.x + bar.x_offset, top + theme::BAR_INSET),
            Vec2::new(bar.width_px.max(6.0), rows.row_height - theme::BAR_INSET * 2.0),
        );
        if !bar_rect.expand(theme::HANDLE_WIDTH).intersects(canvas)
            || bar_rect.center().y < header_bottom
        {
            continue;
        }

        let is_selected = session.selected() == Some(task.id);
        draw_task_bar(&painter, bar_rect, task, is_selected, critical.is_critical(task.id));

        let bar_response = ui
            .interact(
                bar_rect,
                ui.make_persistent_id(("task-bar", task.id)),
                Sense::click_and_drag(),
            )
            .on_hover_text(tooltip(task, critical.is_critical(task.id)));
        let left_handle = Rect::from_min_max(
            Pos2::new(bar_rect.left() - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
            Pos2::new(bar_rect.left() + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
        );
        let right_handle = Rect::from_min_max(
            Pos2::new(bar_rect.right() - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
            Pos2::new(bar_rect.right() + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
        );
        let left_response = ui.interact(
            left_handle.expand(3.0),
            ui.make_persistent_id(("task-resize-left", task.id)),
            Sense::drag(),
        );
        let right_response = ui.interact(
            right_handle.expand(3.0),
            ui.make_persistent_id(("task-resize-right", task.id)),
            Sense::drag(),
        );

        for (resp, drag_type) in [
            (&left_response, DragType::ResizeStart),
            (&right_response, DragType::ResizeEnd),
            (&bar_response, DragType::Move),
        ] {
            if resp.drag_started() {
                consumed_click = true;
                if let Some(pos) = resp.interact_pointer_pos() {
                    if let Err(rejected) = session.pointer_down(task, drag_type, pos.x, pos.y) {
                        tracing::debug!("{}", rejected);
                    }
                }
            }
        }

        if bar_response.clicked() {
            session.select(task.id);
            consumed_click = true;
        }
        if bar_response.double_clicked() {
            session.request_edit(task.id);
        }
        bar_response.context_menu(|ui| {
            if ui.button("Edit…").clicked() {
                session.request_edit(task.id);
                ui.close_menu();
            }
            if ui.button("Delete").clicked() {
                session.request_delete(task.id);
                ui.close_menu();
            }
        });

        if left_response.hovered() || right_response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        } else if bar_response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if is_selected || left_response.hovered() || right_response.hovered() {
            draw_handles(&painter, bar_rect);
        }
    }

    drive_active_drag(session, tasks, ui);

    draw_timeline_header(&painter, canvas, origin, &geometry, &ticks, scale.unit);

    // Empty click on background clears selection
    if response.clicked() && !consumed_click {
        session.clear_selection();
    }
}

/// Forward global pointer state to the session while a gesture is active.
fn drive_active_drag(session: &mut ChartSession, tasks: &[ProjectTask], ui: &Ui) {
    if !session.drag().is_dragging() {
        return;
    }

    let (has_pointer, primary_down, pos) = ui.input(|i| {
        (
            i.pointer.has_pointer(),
            i.pointer.primary_down(),
            i.pointer.latest_pos(),
        )
    });

    if !has_pointer {
        session.pointer_leave();
        return;
    }
    if let Some(pos) = pos {
        session.pointer_move(tasks, pos.x);
    }
    if primary_down {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    } else {
        session.pointer_up();
    }
}

fn handle_zoom_and_pan(session: &mut ChartSession, canvas: Rect, ui: &Ui) {
    if !ui.rect_contains_pointer(canvas) {
        return;
    }

    let (zoom_delta, scroll, middle_down, pointer_delta) = ui.input(|i| {
        (
            i.zoom_delta(),
            i.smooth_scroll_delta,
            i.pointer.middle_down(),
            i.pointer.delta(),
        )
    });

    // Ctrl+scroll and pinch arrive as a zoom factor
    if zoom_delta != 1.0 {
        let target = session.viewport().zoom_level() * zoom_delta;
        session.set_zoom(target);
    } else if scroll != Vec2::ZERO {
        session.pan_by(scroll.x, scroll.y);
    }

    if middle_down && pointer_delta != Vec2::ZERO {
        session.pan_by(pointer_delta.x, pointer_delta.y);
    }
}

fn tooltip(task: &ProjectTask, is_critical: bool) -> String {
    let mut text = format!(
        "{}\n{} → {} ({} d)\n{} · {}% · {}",
        task.name,
        task.start.format("%d/%m/%Y"),
        task.end().format("%d/%m/%Y"),
        task.duration(),
        task.status.label(),
        task.progress(),
        task.priority.label(),
    );
    if let Some(who) = &task.assignee {
        text.push_str(&format!("\nAssignee: {}", who));
    }
    if is_critical {
        text.push_str("\nOn the critical path");
    }
    text
}

fn draw_timeline_header(
    painter: &egui::Painter,
    canvas: Rect,
    origin: Pos2,
    geometry: &ChartGeometry,
    ticks: &[NaiveDate],
    unit: ScaleUnit,
) {
    let header = Rect::from_min_size(
        canvas.min,
        Vec2::new(canvas.width(), geometry.rows.header_height),
    );
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let header_painter = painter.with_clip_rect(header);
    let mut last_month = None;
    for &tick in ticks {
        let x = origin.x + geometry.date_x(tick);

        if unit != ScaleUnit::Month {
            let color = if unit == ScaleUnit::Day && tick.weekday().num_days_from_monday() >= 5 {
                theme::TEXT_DIM
            } else {
                theme::TEXT_SECONDARY
            };
            header_painter.text(
                Pos2::new(x + 3.0, canvas.top() + 30.0),
                egui::Align2::LEFT_CENTER,
                tick.format(unit.label_format()).to_string(),
                theme::font_sub(),
                color,
            );
        }

        let month = (tick.year(), tick.month());
        if last_month != Some(month) {
            last_month = Some(month);
            header_painter.text(
                Pos2::new(x + 3.0, canvas.top() + 13.0),
                egui::Align2::LEFT_CENTER,
                tick.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
    }
}

fn draw_today_line(
    painter: &egui::Painter,
    origin: Pos2,
    geometry: &ChartGeometry,
    canvas: Rect,
    header_bottom: f32,
) {
    let today = chrono::Local::now().date_naive();
    let x = origin.x + geometry.date_x(today);
    if x < canvas.left() || x > canvas.right() {
        return;
    }

    painter.line_segment(
        [Pos2::new(x, header_bottom), Pos2::new(x, canvas.bottom())],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, header_bottom - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_dependency(painter: &egui::Painter, origin: Pos2, path: &EdgePath, color: Color32) {
    let to_screen = |p: Point| Pos2::new(origin.x + p.x, origin.y + p.y);
    let points = [to_screen(path.from), to_screen(path.control), to_screen(path.to)];

    painter.add(QuadraticBezierShape::from_points_stroke(
        points,
        false,
        Color32::TRANSPARENT,
        Stroke::new(1.2, color),
    ));

    let tip = points[2];
    painter.add(Shape::convex_polygon(
        vec![tip, tip + Vec2::new(-6.0, -4.0), tip + Vec2::new(-6.0, 4.0)],
        color,
        Stroke::NONE,
    ));
}

fn draw_task_bar(
    painter: &egui::Painter,
    bar_rect: Rect,
    task: &ProjectTask,
    is_selected: bool,
    is_critical: bool,
) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = theme::status_color(task.status);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, fill);

    let progress = f32::from(task.progress()) / 100.0;
    if progress > 0.0 {
        let progress_rect = Rect::from_min_size(
            bar_rect.min,
            Vec2::new(bar_rect.width() * progress, bar_rect.height()),
        );
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if is_critical {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.5, theme::CRITICAL));
    }
    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Task name on bar (single line, clipped to bar bounds)
    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter.with_clip_rect(bar_rect).galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }
}

