pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::{export_csv, write_csv};
pub use csv_import::{import_csv, import_csv_str, CsvImport};
pub use file::{load_critical_path, load_project, save_project};
