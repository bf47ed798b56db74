use crate::focus_scheduler::DEFAULT_FOCUS_DELAY;
use crate::reading_order::{DEFAULT_ROW_TOLERANCE, ReadingOrder};
use crate::view::ViewOptions;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "annotation-navigator";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write settings file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings")]
    Serialize(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Milliseconds between a navigation request and the focus attempt
    #[serde(default = "default_focus_delay_ms")]
    pub focus_delay_ms: u64,

    /// Vertical distance under which annotations share a row
    #[serde(default = "default_row_tolerance")]
    pub row_tolerance: f64,

    #[serde(default = "default_coordinate_precision")]
    pub coordinate_precision: usize,

    /// Drop pending focus requests when a newer navigation arrives
    #[serde(default)]
    pub cancel_superseded_focus: bool,

    #[serde(default = "default_page_label")]
    pub page_label: String,

    #[serde(default = "default_focus_label")]
    pub focus_label: String,

    /// Label of the kind filter option that shows every annotation
    #[serde(default = "default_all_kinds_label")]
    pub all_kinds_label: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_focus_delay_ms() -> u64 {
    DEFAULT_FOCUS_DELAY.as_millis() as u64
}

fn default_row_tolerance() -> f64 {
    DEFAULT_ROW_TOLERANCE
}

fn default_coordinate_precision() -> usize {
    4
}

fn default_page_label() -> String {
    "Page".to_string()
}

fn default_focus_label() -> String {
    "Focus".to_string()
}

fn default_all_kinds_label() -> String {
    "All".to_string()
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            focus_delay_ms: default_focus_delay_ms(),
            row_tolerance: default_row_tolerance(),
            coordinate_precision: default_coordinate_precision(),
            cancel_superseded_focus: false,
            page_label: default_page_label(),
            focus_label: default_focus_label(),
            all_kinds_label: default_all_kinds_label(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

impl NavigatorSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut settings: Self =
            serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded settings from {path:?}");

        if settings.version < CURRENT_VERSION {
            migrate_settings(&mut settings);
        }
        Ok(settings)
    }

    /// Loads settings, falling back to defaults when the file is missing or broken.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            warn!("Could not determine config directory, using default settings");
            return Self::default();
        };

        if !path.exists() {
            info!("Settings file {path:?} not found, using defaults");
            return Self::default();
        }

        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e}, using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved settings to {path:?}");
        Ok(())
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn reading_order(&self) -> ReadingOrder {
        ReadingOrder::new(self.row_tolerance)
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            coordinate_precision: self.coordinate_precision,
            page_label: self.page_label.clone(),
            focus_label: self.focus_label.clone(),
            all_kinds_label: self.all_kinds_label.clone(),
        }
    }
}

fn migrate_settings(settings: &mut NavigatorSettings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}
