//! Configuration file handling.
//!
//! Settings live in an INI file at `<config dir>/chargemap/config.ini`:
//!
//! ```ini
//! [cluster]
//! grid_size = 80
//! min_cluster_size = 3
//! max_zoom = 15
//! green_min_ratio = 0.5
//! amber_min_ratio = 0.2
//!
//! [map]
//! center_lat = 31.8206
//! center_lng = 117.2272
//! zoom = 13
//! width = 1280
//! height = 800
//!
//! [logging]
//! level = info
//! file = /var/log/chargemap.log
//! ```
//!
//! Missing keys keep their defaults.

mod keys;

pub use keys::ConfigKey;

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::cluster::{
    ClusterConfig, ColorThresholds, DEFAULT_AMBER_MIN_RATIO, DEFAULT_GREEN_MIN_RATIO,
    DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM_FOR_CLUSTERING, DEFAULT_MIN_CLUSTER_SIZE,
};
use crate::coord::GeoPoint;
use crate::logging::{LoggingOptions, DEFAULT_LOG_LEVEL};
use crate::map::{ViewportConfig, DEFAULT_CENTER, DEFAULT_HEIGHT_PX, DEFAULT_WIDTH_PX, DEFAULT_ZOOM};

/// Errors from loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file at the expected location.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read or parsed.
    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("Failed to write configuration {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value failed validation.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The key does not exist.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[cluster]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    pub grid_size: f64,
    pub min_cluster_size: usize,
    pub max_zoom: f64,
    pub green_min_ratio: f64,
    pub amber_min_ratio: f64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            max_zoom: DEFAULT_MAX_ZOOM_FOR_CLUSTERING,
            green_min_ratio: DEFAULT_GREEN_MIN_RATIO,
            amber_min_ratio: DEFAULT_AMBER_MIN_RATIO,
        }
    }
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER.lat,
            center_lng: DEFAULT_CENTER.lng,
            zoom: DEFAULT_ZOOM,
            width_px: DEFAULT_WIDTH_PX,
            height_px: DEFAULT_HEIGHT_PX,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `chargemap=debug`.
    pub level: String,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub cluster: ClusterSettings,
    pub map: MapSettings,
    pub logging: LoggingSettings,
}

/// Location of the user's configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chargemap")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Build from parsed INI data.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Check rules that span more than one key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster.green_min_ratio < self.cluster.amber_min_ratio {
            return Err(ConfigError::InvalidValue {
                key: ConfigKey::ClusterGreenRatio.name(),
                value: self.cluster.green_min_ratio.to_string(),
                reason: format!(
                    "must not be below {} ({})",
                    ConfigKey::ClusterAmberRatio,
                    self.cluster.amber_min_ratio
                ),
            });
        }
        Ok(())
    }

    /// Set a single key in the file at `path`, creating the file if needed.
    ///
    /// Only that key is rewritten; other entries are kept as they are, even
    /// ones that would not load. Returns the stored value.
    pub fn set_in_file(path: &Path, key: ConfigKey, value: &str) -> Result<String, ConfigError> {
        let mut ini = if path.exists() {
            Ini::load_from_file(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Ini::new()
        };

        // Entries that parse; anything broken keeps its default here.
        let mut scratch = Self::default();
        for other in ConfigKey::all() {
            if let Some(current) = ini.get_from(Some(other.section()), other.key_name()) {
                let _ = other.set(&mut scratch, current);
            }
        }
        key.set(&mut scratch, value)?;
        if matches!(key, ConfigKey::ClusterGreenRatio | ConfigKey::ClusterAmberRatio) {
            scratch.validate()?;
        }

        let stored = key.get(&scratch);
        if stored.is_empty() {
            ini.delete_from(Some(key.section()), key.key_name());
        } else {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), stored.clone());
        }
        write_ini(&ini, path)?;
        Ok(stored)
    }

    /// Render as INI data. Unset values are omitted.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Save to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        write_ini(&self.to_ini(), path)
    }

    /// Cluster engine configuration.
    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig::default()
            .with_grid_size(self.cluster.grid_size)
            .with_min_cluster_size(self.cluster.min_cluster_size)
            .with_max_zoom_for_clustering(self.cluster.max_zoom)
            .with_colors(ColorThresholds {
                green_min: self.cluster.green_min_ratio,
                amber_min: self.cluster.amber_min_ratio,
            })
    }

    /// Initial map camera.
    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig::default()
            .with_size(self.map.width_px, self.map.height_px)
            .with_center(GeoPoint::new(self.map.center_lat, self.map.center_lng))
            .with_zoom(self.map.zoom)
    }

    /// Logging setup.
    pub fn logging_options(&self) -> LoggingOptions {
        LoggingOptions {
            level: self.logging.level.clone(),
            file: self.logging.file.clone(),
        }
    }
}

fn write_ini(ini: &Ini, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    ini.write_to_file(path).map_err(write_err)
}
