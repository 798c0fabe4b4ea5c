use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use uuid::Uuid;

use gantt_geometry::config::AppSettings;
use gantt_geometry::events::{ChartEvent, EventFilter, EventQueue, ExportFormat};
use gantt_geometry::filter;
use gantt_geometry::io;
use gantt_geometry::metrics::{self, CriticalPath, CriticalPathEntry};
use gantt_geometry::model::{
    Project, ProjectDependency, ProjectTask, TaskPriority, TaskStatus, Timeline,
};
use gantt_geometry::ChartSession;

use crate::ui;

/// Days of margin around the task range on the canvas.
const PAD_BEFORE: i64 = 7;
const PAD_AFTER: i64 = 30;

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub session: ChartSession,
    events: EventQueue,
    /// Frozen while a drag is active so the canvas origin does not move
    /// under the pointer.
    timeline: Timeline,
    critical_path: Vec<CriticalPathEntry>,
    pub file_path: Option<PathBuf>,
    settings: AppSettings,

    // Dialog state
    pub show_add_task: bool,
    pub show_about: bool,
    pub new_task_name: String,
    pub new_task_start: NaiveDate,
    pub new_task_duration: u32,
    pub new_task_assignee: String,

    /// Draft of the task being edited in the side panel.
    editor_draft: Option<ProjectTask>,

    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings = AppSettings::load_or_default();
        let session = ChartSession::new(settings.chart.clone());
        let (_, events) = session.bus().subscribe_queue(EventFilter::All);

        let (project, file_path, status_message) = match settings.last_project.clone() {
            Some(path) => match io::load_project(&path) {
                Ok(project) => (project, Some(path), "Project loaded".to_string()),
                Err(e) => {
                    tracing::warn!("Could not reopen last project: {}", e);
                    (Self::sample_project(), None, format!("Error loading: {}", e))
                }
            },
            None => (Self::sample_project(), None, "Ready".to_string()),
        };

        let today = Local::now().date_naive();
        let mut app = Self {
            project,
            session,
            events,
            timeline: Timeline::new(today, today),
            critical_path: Vec::new(),
            file_path,
            settings,
            show_add_task: false,
            show_about: false,
            new_task_name: String::new(),
            new_task_start: today,
            new_task_duration: 5,
            new_task_assignee: String::new(),
            editor_draft: None,
            status_message,
        };
        app.refresh_timeline();
        app
    }

    /// Generate a sample project for demonstration.
    fn sample_project() -> Project {
        let today = Local::now().date_naive();
        let mut project = Project::new("Sample Project");

        let kickoff = ProjectTask::new("Project Kickoff", today - Duration::days(5), 3)
            .with_status(TaskStatus::Completed)
            .with_progress(100)
            .with_assignee("Alex");
        let requirements = ProjectTask::new("Requirements Gathering", today - Duration::days(2), 7)
            .with_status(TaskStatus::InProgress)
            .with_progress(60)
            .with_assignee("Sam");
        let design = ProjectTask::new("UI Design", today + Duration::days(6), 12)
            .with_priority(TaskPriority::High)
            .with_assignee("Robin");
        let backend = ProjectTask::new("Backend Development", today + Duration::days(6), 22)
            .with_priority(TaskPriority::Critical)
            .with_assignee("Sam");
        let qa = ProjectTask::new("Testing & QA", today + Duration::days(28), 8)
            .with_status(TaskStatus::OnHold)
            .with_assignee("Alex");
        let launch = ProjectTask::new("Launch", today + Duration::days(36), 1)
            .with_priority(TaskPriority::Critical);

        let links = [
            ProjectDependency::finish_to_start(kickoff.id, requirements.id),
            ProjectDependency::finish_to_start(requirements.id, design.id),
            ProjectDependency::finish_to_start(requirements.id, backend.id),
            ProjectDependency::finish_to_start(backend.id, qa.id),
            ProjectDependency::finish_to_start(qa.id, launch.id),
        ];

        for task in [kickoff, requirements, design, backend, qa, launch] {
            project.add_task(task);
        }
        for link in links {
            project.add_dependency(link);
        }
        project
    }

    fn refresh_timeline(&mut self) {
        let today = Local::now().date_naive();
        self.timeline = self
            .project
            .timeline()
            .unwrap_or_else(|| Timeline::new(today, today))
            .padded(PAD_BEFORE, PAD_AFTER);
    }

    fn replace_project(&mut self, project: Project, path: Option<PathBuf>) {
        self.project = project;
        self.file_path = path;
        self.critical_path.clear();
        self.editor_draft = None;
        self.session.clear_selection();
        self.session.reset_view();
        self.refresh_timeline();
        self.remember_project();
    }

    fn remember_project(&mut self) {
        if self.settings.last_project != self.file_path {
            self.settings.last_project = self.file_path.clone();
            self.persist_settings();
        }
    }

    fn persist_settings(&self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("Failed to save settings: {}", e);
        }
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.replace_project(Project::default(), None);
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .pick_file()
        {
            match io::load_project(&path) {
                Ok(project) => {
                    self.replace_project(project, Some(path));
                    self.status_message = "Project loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        match self.file_path.clone() {
            Some(path) => {
                self.project.touch();
                match io::save_project(&self.project, &path) {
                    Ok(()) => self.status_message = "Project saved".to_string(),
                    Err(e) => self.status_message = format!("Error saving: {}", e),
                }
            }
            None => self.save_project_as(),
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .set_file_name(format!("{}.gantt.json", self.project.name))
            .save_file()
        {
            self.project.touch();
            match io::save_project(&self.project, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.remember_project();
                    self.status_message = "Project saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        if !self.project.tasks.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current project. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };

        match io::import_csv(&path) {
            Ok(imported) => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Imported Project")
                    .to_string();
                let count = imported.tasks.len();
                let mut project = Project::new(name);
                project.tasks = imported.tasks;
                self.replace_project(project, None);

                self.status_message = if imported.skipped > 0 {
                    format!("Imported {} tasks ({} rows skipped)", count, imported.skipped)
                } else {
                    format!("Imported {} tasks", count)
                };
            }
            Err(e) => {
                self.status_message = format!("CSV import failed: {}", e);
            }
        }
    }

    pub fn load_critical_path(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Critical Path", &["json"])
            .pick_file()
        {
            match io::load_critical_path(&path) {
                Ok(entries) => {
                    self.status_message =
                        format!("Loaded critical path ({} entries)", entries.len());
                    self.critical_path = entries;
                }
                Err(e) => self.status_message = format!("Error loading critical path: {}", e),
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        if !matches!(format, ExportFormat::Csv | ExportFormat::Json) {
            self.status_message = format!("{} export is not available here", format.label());
            return;
        }
        if self.project.tasks.is_empty() {
            self.status_message = "Nothing to export: project has no tasks".to_string();
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(format!("{}.{}", self.project.name, format.extension()))
            .save_file()
        else {
            return;
        };

        let result = match format {
            ExportFormat::Csv => io::export_csv(&self.project.tasks, &path)
                .map(|count| format!("Exported {} tasks to CSV", count)),
            _ => io::save_project(&self.project, &path).map(|()| "Exported JSON".to_string()),
        };
        self.status_message = match result {
            Ok(msg) => msg,
            Err(e) => format!("{} export failed: {}", format.label(), e),
        };
    }

    // --- Task operations ---

    pub fn create_task_from_dialog(&mut self) {
        let name = match self.new_task_name.trim() {
            "" => "New Task".to_string(),
            name => name.to_string(),
        };
        let mut task = ProjectTask::new(name, self.new_task_start, self.new_task_duration);
        let assignee = self.new_task_assignee.trim();
        if !assignee.is_empty() {
            task = task.with_assignee(assignee);
        }

        let id = task.id;
        self.project.add_task(task);
        self.session.select(id);
        self.refresh_timeline();
        self.reset_dialog_fields();
        self.status_message = "Task added".to_string();
    }

    fn delete_task(&mut self, id: Uuid) {
        if let Some(removed) = self.project.remove_task(id) {
            if self.editor_draft.as_ref().map(|t| t.id) == Some(id) {
                self.editor_draft = None;
            }
            self.refresh_timeline();
            self.status_message = format!("Deleted '{}'", removed.name);
        }
    }

    fn open_editor(&mut self, id: Uuid) {
        self.editor_draft = self.project.task(id).cloned();
    }

    fn reset_dialog_fields(&mut self) {
        self.new_task_name.clear();
        self.new_task_assignee.clear();
        self.new_task_start = Local::now().date_naive();
        self.new_task_duration = 5;
    }

    /// Apply everything the chart published since the last frame.
    fn process_events(&mut self) {
        for event in self.events.drain() {
            match event {
                ChartEvent::TaskUpdated(task) => {
                    self.status_message = format!(
                        "Updated '{}' ({} → {})",
                        task.name,
                        task.start.format("%Y-%m-%d"),
                        task.end().format("%Y-%m-%d")
                    );
                    if let Some(draft) = self.editor_draft.as_mut().filter(|d| d.id == task.id) {
                        draft.start = task.start;
                        draft.set_duration(task.duration());
                    }
                    self.project.replace_task(task);
                }
                ChartEvent::DragFinished(_) => self.refresh_timeline(),
                ChartEvent::TaskSelected(_) | ChartEvent::SelectionCleared => {}
                ChartEvent::EditRequested(id) => self.open_editor(id),
                ChartEvent::DeleteRequested(id) => self.delete_task(id),
                ChartEvent::ExportRequested(format) => self.export(format),
                ChartEvent::ViewportChanged(_) => {}
            }
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_project();
        }
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            if let Some(id) = self.session.selected() {
                self.session.request_delete(id);
            }
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Zoom: {:.0}%",
                                self.session.viewport().zoom_level() * 100.0
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let critical = CriticalPath::new(&self.critical_path);

        // Left panel: metrics, editor, filters and task table
        let mut table_action = ui::task_table::TaskTableAction::None;
        let mut editor_action = ui::task_editor::EditorAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(260.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                let summary = metrics::summarize(&self.project.tasks, &self.critical_path);
                ui::metrics_panel::show_metrics(&summary, ui);
                ui.separator();

                if let Some(draft) = self.editor_draft.as_mut() {
                    editor_action = ui::task_editor::show_task_editor(
                        draft,
                        &self.project.tasks,
                        &self.project.dependencies,
                        ui,
                    );
                    ui.add_space(4.0);
                    ui.separator();
                }

                let assignees = filter::assignees(&self.project.tasks);
                ui::filter_bar::show_filter_bar(&mut self.session.filters, &assignees, ui);
                ui.add_space(2.0);

                let visible = self.session.visible(&self.project.tasks);
                table_action = ui::task_table::show_task_table(
                    &visible,
                    self.project.tasks.len(),
                    self.session.selected(),
                    &critical,
                    ui,
                );
            });

        match table_action {
            ui::task_table::TaskTableAction::Select(id) => self.session.select(id),
            ui::task_table::TaskTableAction::Edit(id) => self.session.request_edit(id),
            ui::task_table::TaskTableAction::Delete(id) => self.session.request_delete(id),
            ui::task_table::TaskTableAction::Add => self.show_add_task = true,
            ui::task_table::TaskTableAction::None => {}
        }

        match editor_action {
            ui::task_editor::EditorAction::Save => {
                if let Some(draft) = self.editor_draft.take() {
                    self.status_message = format!("Saved '{}'", draft.name);
                    self.project.replace_task(draft);
                    self.refresh_timeline();
                }
            }
            ui::task_editor::EditorAction::Cancel => self.editor_draft = None,
            ui::task_editor::EditorAction::AddDependency(dep) => {
                if self.project.add_dependency(dep) {
                    self.status_message = "Dependency added".to_string();
                }
            }
            ui::task_editor::EditorAction::RemoveDependency(from, to) => {
                self.project
                    .dependencies
                    .retain(|d| !(d.from_task == from && d.to_task == to));
                self.project.touch();
                self.status_message = "Dependency removed".to_string();
            }
            ui::task_editor::EditorAction::None => {}
        }

        // Central panel: Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            ui::gantt_chart::show_gantt_chart(
                &mut self.session,
                &self.project.tasks,
                &self.project.dependencies,
                self.timeline,
                &critical,
                ui,
            );
        });

        self.process_events();

        // Dialogs
        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.chart.show_dependencies = self.session.filters.show_dependencies;
        self.persist_settings();
    }
}
