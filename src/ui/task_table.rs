use egui::{Color32, RichText, Ui};
use gantt_geometry::metrics::CriticalPath;
use gantt_geometry::model::ProjectTask;
use uuid::Uuid;

use crate::ui::theme;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(Uuid),
    Edit(Uuid),
    Delete(Uuid),
    Add,
}

/// Render the left-side task table over the visible (filtered) tasks.
pub fn show_task_table(
    visible: &[&ProjectTask],
    total: usize,
    selected_task: Option<Uuid>,
    critical: &CriticalPath,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        let count = if visible.len() == total {
            format!("({})", total)
        } else {
            format!("({} of {})", visible.len(), total)
        };
        ui.label(RichText::new(count).size(11.0).color(theme::TEXT_DIM));
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Task", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::Add;
    }

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, task) in visible.iter().enumerate() {
                let is_selected = selected_task == Some(task.id);

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;

                        let (dot_rect, _) =
                            ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(
                            dot_rect.center(),
                            3.0,
                            theme::status_color(task.status),
                        );

                        let name = if critical.is_critical(task.id) {
                            format!("{} {}", egui_phosphor::regular::LIGHTNING, task.name)
                        } else {
                            task.name.clone()
                        };
                        let name_color = if is_selected {
                            Color32::WHITE
                        } else {
                            theme::TEXT_PRIMARY
                        };
                        ui.add(egui::Label::new(RichText::new(name).size(12.0).color(name_color)).truncate());

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.spacing_mut().item_spacing.x = 4.0;

                            let del_btn = ui.add(
                                egui::Button::new(
                                    RichText::new(egui_phosphor::regular::TRASH)
                                        .size(11.0)
                                        .color(theme::TEXT_DIM),
                                )
                                .frame(false),
                            );
                            if del_btn.on_hover_text("Delete task").clicked() {
                                action = TaskTableAction::Delete(task.id);
                            }

                            let pbar = egui::ProgressBar::new(f32::from(task.progress()) / 100.0)
                                .desired_width(48.0)
                                .text(RichText::new(format!("{}%", task.progress())).size(9.0));
                            ui.add(pbar);

                            ui.label(
                                RichText::new(task.end().format("%d/%m").to_string())
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                            );
                            ui.label(
                                RichText::new(task.start.format("%d/%m").to_string())
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                            );
                        });
                    });
                });

                let row = frame_resp.response.interact(egui::Sense::click());
                if row.double_clicked() {
                    action = TaskTableAction::Edit(task.id);
                } else if row.clicked() {
                    action = TaskTableAction::Select(task.id);
                }
            }

            if visible.is_empty() {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    let hint = if total == 0 {
                        "No tasks yet"
                    } else {
                        "No tasks match the filters"
                    };
                    ui.label(RichText::new(hint).color(theme::TEXT_DIM));
                });
            }
        });

    action
}
