#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

fn main() -> anyhow::Result<()> {
    if let Err(e) = gantt_geometry::init_logging() {
        eprintln!("logging already initialised: {}", e);
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Geometry"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Geometry",
        options,
        Box::new(|cc| Ok(Box::new(app::GanttApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))
}
