use egui::{RichText, Ui};
use gantt_geometry::metrics::ProjectMetrics;
use gantt_geometry::model::TaskStatus;

use crate::ui::theme;

/// Compact project summary shown above the task table.
pub fn show_metrics(metrics: &ProjectMetrics, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("{:.0}%", metrics.actual_progress))
                .strong()
                .size(18.0)
                .color(theme::ACCENT),
        );
        ui.vertical(|ui| {
            ui.label(
                RichText::new(format!(
                    "{} of {} done",
                    metrics.completed_tasks, metrics.total_tasks
                ))
                .size(11.0)
                .color(theme::TEXT_SECONDARY),
            );
            let finish = metrics
                .estimated_completion
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_else(|| "n/a".to_string());
            ui.label(
                RichText::new(format!("Finish: {}", finish))
                    .size(10.5)
                    .color(theme::TEXT_DIM),
            );
        });
    });

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 10.0;
        for status in TaskStatus::ALL {
            let count = metrics.count(status);
            if count == 0 {
                continue;
            }
            ui.label(
                RichText::new(format!("● {} {}", count, status.label()))
                    .size(10.5)
                    .color(theme::status_color(status)),
            );
        }
        if metrics.critical_path_length > 0 {
            ui.label(
                RichText::new(format!(
                    "{} {} critical",
                    egui_phosphor::regular::LIGHTNING,
                    metrics.critical_path_length
                ))
                .size(10.5)
                .color(theme::CRITICAL),
            );
        }
    });
}
