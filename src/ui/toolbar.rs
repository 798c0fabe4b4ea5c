use crate::app::GanttApp;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icon;
use gantt_geometry::config::AppSettings;
use gantt_geometry::events::ExportFormat;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  File  ", |ui| {
            if ui.button(format!("{}  New Project", icon::FILE)).clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icon::FOLDER_OPEN)).clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .button(format!("{}  Save          Ctrl+S", icon::FLOPPY_DISK))
                .clicked()
            {
                app.save_project();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.save_project_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icon::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("      Load Critical Path...").clicked() {
                app.load_critical_path();
                ui.close_menu();
            }
            ui.menu_button(format!("{}  Export", icon::EXPORT), |ui| {
                for format in ExportFormat::ALL {
                    if ui.button(format.label()).clicked() {
                        app.session.request_export(format);
                        ui.close_menu();
                    }
                }
            });
        });

        ui.menu_button("  View  ", |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.session.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.session.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Reset View").clicked() {
                app.session.reset_view();
                ui.close_menu();
            }
            ui.separator();
            ui.checkbox(&mut app.session.filters.show_dependencies, "Show dependencies");
            ui.separator();
            if ui.button("  Open Settings Folder").clicked() {
                match AppSettings::config_dir() {
                    Ok(dir) => {
                        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
                            tracing::warn!(error = %e, "failed to open settings folder");
                        }
                    }
                    Err(e) => app.status_message = e.to_string(),
                }
                ui.close_menu();
            }
        });

        ui.menu_button("  Help  ", |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.project.name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
