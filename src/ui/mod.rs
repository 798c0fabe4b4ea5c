pub mod dialogs;
pub mod filter_bar;
pub mod gantt_chart;
pub mod metrics_panel;
pub mod task_editor;
pub mod task_table;
pub mod theme;
pub mod toolbar;
