use egui::{RichText, Ui};
use gantt_geometry::filter::{FilterState, Selection};
use gantt_geometry::model::{TaskPriority, TaskStatus};

use crate::ui::theme;

fn selection_text<T>(selection: &Selection<T>, label: impl Fn(&T) -> String) -> String {
    match selection {
        Selection::All => "All".to_string(),
        Selection::Only(value) => label(value),
    }
}

/// Search box and filter combos above the task table.
pub fn show_filter_bar(filters: &mut FilterState, assignees: &[String], ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS).color(theme::TEXT_DIM));
        ui.add_sized(
            [ui.available_width() - 24.0, 22.0],
            egui::TextEdit::singleline(&mut filters.search).hint_text("Search tasks…"),
        );
        if !filters.search.is_empty()
            && ui
                .add(egui::Button::new(egui_phosphor::regular::X).frame(false))
                .on_hover_text("Clear search")
                .clicked()
        {
            filters.search.clear();
        }
    });

    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("filter_status")
            .selected_text(selection_text(&filters.status, |s| s.label().to_string()))
            .width(96.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filters.status, Selection::All, "All");
                for status in TaskStatus::ALL {
                    ui.selectable_value(&mut filters.status, Selection::Only(status), status.label());
                }
            });
        egui::ComboBox::from_id_salt("filter_priority")
            .selected_text(selection_text(&filters.priority, |p| p.label().to_string()))
            .width(80.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filters.priority, Selection::All, "All");
                for priority in TaskPriority::ALL {
                    ui.selectable_value(
                        &mut filters.priority,
                        Selection::Only(priority),
                        priority.label(),
                    );
                }
            });
        egui::ComboBox::from_id_salt("filter_assignee")
            .selected_text(selection_text(&filters.assignee, |a| a.clone()))
            .width(96.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filters.assignee, Selection::All, "All");
                for name in assignees {
                    ui.selectable_value(
                        &mut filters.assignee,
                        Selection::Only(name.clone()),
                        name.as_str(),
                    );
                }
            });
    });

    ui.horizontal(|ui| {
        ui.checkbox(&mut filters.show_completed, "Completed");
        ui.checkbox(&mut filters.show_dependencies, "Links");
        if !filters.is_pass_through()
            && ui
                .small_button("Reset")
                .on_hover_text("Clear all filters")
                .clicked()
        {
            *filters = FilterState {
                show_dependencies: filters.show_dependencies,
                ..Default::default()
            };
        }
    });
}
