use chrono::NaiveDate;
use egui::{Color32, RichText, Ui};
use gantt_geometry::model::{
    DependencyKind, ProjectDependency, ProjectTask, TaskPriority, TaskStatus,
};
use uuid::Uuid;

use crate::ui::theme;

/// Actions the editor can request.
pub enum EditorAction {
    None,
    Save,
    Cancel,
    RemoveDependency(Uuid, Uuid),
    AddDependency(ProjectDependency),
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render an inline editor over a draft copy of a task.
///
/// The draft is only written back to the project when the editor returns
/// [`EditorAction::Save`].
pub fn show_task_editor(
    draft: &mut ProjectTask,
    all_tasks: &[ProjectTask],
    dependencies: &[ProjectDependency],
    ui: &mut Ui,
) -> EditorAction {
    let mut action = EditorAction::None;
    let task_id = draft.id;

    ui.add_space(6.0);
    ui.label(
        RichText::new("Edit Task")
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        section_label(ui, "Name");
        ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut draft.name)
                .font(egui::FontId::proportional(12.0))
                .text_color(theme::TEXT_PRIMARY),
        );

        // ── Dates ──────────────────────────────────────────────────────
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                section_label(ui, "Start");
                ui.add(
                    egui_extras::DatePickerButton::new(&mut draft.start)
                        .id_salt("editor_dp_start"),
                );
            });
            ui.add_space(8.0);
            ui.vertical(|ui| {
                section_label(ui, "End");
                let mut end: NaiveDate = draft.end();
                let picked = ui.add(
                    egui_extras::DatePickerButton::new(&mut end).id_salt("editor_dp_end"),
                );
                if picked.changed() && !draft.set_end(end) {
                    tracing::debug!(%end, "end date before start ignored");
                }
            });
            ui.add_space(8.0);
            ui.vertical(|ui| {
                section_label(ui, "Days");
                let mut duration = draft.duration();
                if ui
                    .add(egui::DragValue::new(&mut duration).speed(0.2).suffix(" d"))
                    .changed()
                {
                    draft.set_duration(duration.max(1));
                }
            });
        });

        // ── Status / Priority ──────────────────────────────────────────
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                section_label(ui, "Status");
                egui::ComboBox::from_id_salt("editor_status")
                    .selected_text(
                        RichText::new(draft.status.label())
                            .size(11.0)
                            .color(theme::status_color(draft.status)),
                    )
                    .width(120.0)
                    .show_ui(ui, |ui| {
                        for status in TaskStatus::ALL {
                            ui.selectable_value(&mut draft.status, status, status.label());
                        }
                    });
            });
            ui.vertical(|ui| {
                section_label(ui, "Priority");
                egui::ComboBox::from_id_salt("editor_priority")
                    .selected_text(
                        RichText::new(draft.priority.label())
                            .size(11.0)
                            .color(theme::priority_color(draft.priority)),
                    )
                    .width(100.0)
                    .show_ui(ui, |ui| {
                        for priority in TaskPriority::ALL {
                            ui.selectable_value(&mut draft.priority, priority, priority.label());
                        }
                    });
            });
        });

        section_label(ui, "Assignee");
        let mut assignee = draft.assignee.clone().unwrap_or_default();
        if ui
            .add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut assignee).hint_text("Unassigned"),
            )
            .changed()
        {
            let trimmed = assignee.trim();
            draft.assignee = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }

        section_label(ui, "Progress");
        let mut progress = draft.progress();
        if ui
            .add(egui::Slider::new(&mut progress, 0..=100).suffix("%"))
            .changed()
        {
            draft.set_progress(progress);
        }

        // ── Dependencies ───────────────────────────────────────────────
        ui.add_space(2.0);
        section_label(ui, "Dependencies");
        let name_of = |id: Uuid| {
            all_tasks
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.name.as_str())
                .unwrap_or("?")
        };
        let mut any = false;
        for dep in dependencies.iter().filter(|d| d.touches(task_id)) {
            any = true;
            ui.horizontal(|ui| {
                let (arrow, other) = if dep.from_task == task_id {
                    (egui_phosphor::regular::ARROW_RIGHT, dep.to_task)
                } else {
                    (egui_phosphor::regular::ARROW_LEFT, dep.from_task)
                };
                ui.label(
                    RichText::new(format!("[{}] {} {}", dep.kind.short_label(), arrow, name_of(other)))
                        .size(11.0)
                        .color(theme::TEXT_SECONDARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let remove = ui.add(
                        egui::Button::new(
                            RichText::new(egui_phosphor::regular::X).color(theme::TEXT_DIM),
                        )
                        .frame(false),
                    );
                    if remove.on_hover_text("Remove dependency").clicked() {
                        action = EditorAction::RemoveDependency(dep.from_task, dep.to_task);
                    }
                });
            });
        }
        if !any {
            ui.label(RichText::new("None").size(11.0).color(theme::TEXT_DIM));
        }

        // Predecessor picker: the selected task becomes the successor
        let candidates: Vec<&ProjectTask> = all_tasks
            .iter()
            .filter(|t| {
                t.id != task_id
                    && !dependencies
                        .iter()
                        .any(|d| d.from_task == t.id && d.to_task == task_id)
            })
            .collect();
        if !candidates.is_empty() {
            egui::ComboBox::from_id_salt("editor_add_dep")
                .selected_text(
                    RichText::new(format!("{} Add predecessor…", egui_phosphor::regular::LINK))
                        .size(11.0),
                )
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for candidate in candidates {
                        if ui.selectable_label(false, candidate.name.as_str()).clicked() {
                            action = EditorAction::AddDependency(ProjectDependency {
                                from_task: candidate.id,
                                to_task: task_id,
                                kind: DependencyKind::FinishToStart,
                            });
                        }
                    }
                });
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let save = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                .fill(theme::ACCENT)
                .rounding(egui::Rounding::same(4.0));
            if ui.add_sized([80.0, 26.0], save).clicked() {
                action = EditorAction::Save;
            }
            if ui.add_sized([80.0, 26.0], egui::Button::new("Cancel")).clicked() {
                action = EditorAction::Cancel;
            }
        });
    });

    action
}
