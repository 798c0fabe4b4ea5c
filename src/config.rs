//! Chart configuration and persisted viewer settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GanttError, Result};
use crate::model::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::projection::{RowLayout, DEFAULT_DAY_WIDTH_PX};

const SETTINGS_FILE: &str = "settings.json";

/// Geometry constants for a chart surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub day_width_px: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub rows: RowLayout,
    pub show_dependencies: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            day_width_px: DEFAULT_DAY_WIDTH_PX,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            rows: RowLayout::default(),
            show_dependencies: true,
        }
    }
}

impl ChartConfig {
    /// Replace out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.day_width_px.is_finite() && self.day_width_px > 0.0) {
            self.day_width_px = defaults.day_width_px;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            self.min_zoom = defaults.min_zoom;
            self.max_zoom = defaults.max_zoom;
        }
        self
    }
}

/// Persisted user settings (lives in the OS config directory).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub chart: ChartConfig,
    pub last_project: Option<PathBuf>,
}

impl AppSettings {
    /// The per-user config directory for this application.
    pub fn config_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("com", "gantt-geometry", "gantt-geometry")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(GanttError::NoConfigDir)
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
        let settings: AppSettings = serde_json::from_str(&json)?;
        Ok(AppSettings {
            chart: settings.chart.sanitized(),
            ..settings
        })
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Using default settings: {}", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to read settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GanttError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| GanttError::io(path, e))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "chart": { "day_width_px": 48.0 } }"#).unwrap();
        assert_eq!(settings.chart.day_width_px, 48.0);
        assert_eq!(settings.chart.max_zoom, MAX_ZOOM);
        assert_eq!(settings.chart.rows, RowLayout::default());
        assert!(settings.last_project.is_none());
    }

    #[test]
    fn sanitize_repairs_nonsense() {
        let cfg = ChartConfig {
            day_width_px: -3.0,
            min_zoom: 5.0,
            max_zoom: 1.0,
            zoom_step: 0.5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg, ChartConfig::default());
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = AppSettings {
            last_project: Some(PathBuf::from("/tmp/plan.gantt.json")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }
}
