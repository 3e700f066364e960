//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::map::{MAX_ZOOM, MIN_ZOOM};

/// Every setting that can be read or written by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ClusterGridSize,
    ClusterMinSize,
    ClusterMaxZoom,
    ClusterGreenRatio,
    ClusterAmberRatio,
    MapCenterLat,
    MapCenterLng,
    MapZoom,
    MapWidth,
    MapHeight,
    LoggingLevel,
    LoggingFile,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::ClusterGridSize,
    ConfigKey::ClusterMinSize,
    ConfigKey::ClusterMaxZoom,
    ConfigKey::ClusterGreenRatio,
    ConfigKey::ClusterAmberRatio,
    ConfigKey::MapCenterLat,
    ConfigKey::MapCenterLng,
    ConfigKey::MapZoom,
    ConfigKey::MapWidth,
    ConfigKey::MapHeight,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ClusterGridSize
            | ConfigKey::ClusterMinSize
            | ConfigKey::ClusterMaxZoom
            | ConfigKey::ClusterGreenRatio
            | ConfigKey::ClusterAmberRatio => "cluster",
            ConfigKey::MapCenterLat
            | ConfigKey::MapCenterLng
            | ConfigKey::MapZoom
            | ConfigKey::MapWidth
            | ConfigKey::MapHeight => "map",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ClusterGridSize => "grid_size",
            ConfigKey::ClusterMinSize => "min_cluster_size",
            ConfigKey::ClusterMaxZoom => "max_zoom",
            ConfigKey::ClusterGreenRatio => "green_min_ratio",
            ConfigKey::ClusterAmberRatio => "amber_min_ratio",
            ConfigKey::MapCenterLat => "center_lat",
            ConfigKey::MapCenterLng => "center_lng",
            ConfigKey::MapZoom => "zoom",
            ConfigKey::MapWidth => "width",
            ConfigKey::MapHeight => "height",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ClusterGridSize => config.cluster.grid_size.to_string(),
            ConfigKey::ClusterMinSize => config.cluster.min_cluster_size.to_string(),
            ConfigKey::ClusterMaxZoom => config.cluster.max_zoom.to_string(),
            ConfigKey::ClusterGreenRatio => config.cluster.green_min_ratio.to_string(),
            ConfigKey::ClusterAmberRatio => config.cluster.amber_min_ratio.to_string(),
            ConfigKey::MapCenterLat => config.map.center_lat.to_string(),
            ConfigKey::MapCenterLng => config.map.center_lng.to_string(),
            ConfigKey::MapZoom => config.map.zoom.to_string(),
            ConfigKey::MapWidth => config.map.width_px.to_string(),
            ConfigKey::MapHeight => config.map.height_px.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse and store a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::ClusterGridSize => {
                config.cluster.grid_size = self.parse_ranged(value, f64::MIN_POSITIVE, f64::MAX)?
            }
            ConfigKey::ClusterMinSize => {
                let n: usize = self.parse(value)?;
                if n == 0 {
                    return Err(self.invalid(value, "must be at least 1"));
                }
                config.cluster.min_cluster_size = n;
            }
            ConfigKey::ClusterMaxZoom => {
                config.cluster.max_zoom = self.parse_ranged(value, MIN_ZOOM, MAX_ZOOM)?
            }
            ConfigKey::ClusterGreenRatio => {
                config.cluster.green_min_ratio = self.parse_ranged(value, 0.0, 1.0)?
            }
            ConfigKey::ClusterAmberRatio => {
                config.cluster.amber_min_ratio = self.parse_ranged(value, 0.0, 1.0)?
            }
            ConfigKey::MapCenterLat => config.map.center_lat = self.parse_ranged(value, -90.0, 90.0)?,
            ConfigKey::MapCenterLng => {
                config.map.center_lng = self.parse_ranged(value, -180.0, 180.0)?
            }
            ConfigKey::MapZoom => config.map.zoom = self.parse_ranged(value, MIN_ZOOM, MAX_ZOOM)?,
            ConfigKey::MapWidth => config.map.width_px = self.parse_nonzero(value)?,
            ConfigKey::MapHeight => config.map.height_px = self.parse_nonzero(value)?,
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigError> {
        value
            .parse()
            .map_err(|_| self.invalid(value, "not a valid number"))
    }

    fn parse_ranged(&self, value: &str, min: f64, max: f64) -> Result<f64, ConfigError> {
        let n: f64 = self.parse(value)?;
        if !(min..=max).contains(&n) {
            return Err(self.invalid(value, &format!("must be between {} and {}", min, max)));
        }
        Ok(n)
    }

    fn parse_nonzero(&self, value: &str) -> Result<u32, ConfigError> {
        let n: u32 = self.parse(value)?;
        if n == 0 {
            return Err(self.invalid(value, "must be greater than 0"));
        }
        Ok(n)
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_key() {
        let key: ConfigKey = "cluster.grid_size".parse().unwrap();
        assert_eq!(key, ConfigKey::ClusterGridSize);
        assert_eq!(key.to_string(), "cluster.grid_size");
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = "cluster.nope".parse::<ConfigKey>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn test_all_keys_roundtrip_through_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
            assert_eq!(key.to_string(), key.name());
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::ClusterMinSize.set(&mut config, "5").unwrap();
        ConfigKey::MapZoom.set(&mut config, " 11.5 ").unwrap();
        ConfigKey::LoggingFile.set(&mut config, "/tmp/chargemap.log").unwrap();

        assert_eq!(ConfigKey::ClusterMinSize.get(&config), "5");
        assert_eq!(ConfigKey::MapZoom.get(&config), "11.5");
        assert_eq!(ConfigKey::LoggingFile.get(&config), "/tmp/chargemap.log");
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::ClusterGridSize.set(&mut config, "0").is_err());
        assert!(ConfigKey::ClusterMinSize.set(&mut config, "0").is_err());
        assert!(ConfigKey::ClusterGreenRatio.set(&mut config, "1.5").is_err());
        assert!(ConfigKey::MapCenterLat.set(&mut config, "95").is_err());
        assert!(ConfigKey::MapWidth.set(&mut config, "0").is_err());
        assert!(ConfigKey::MapZoom.set(&mut config, "abc").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "  ").is_err());

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_invalid_value_message_names_key() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::MapZoom.set(&mut config, "42").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("map.zoom"), "{}", message);
        assert!(message.contains("42"), "{}", message);
    }

    #[test]
    fn test_empty_logging_file_clears_it() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingFile.set(&mut config, "a.log").unwrap();
        ConfigKey::LoggingFile.set(&mut config, "").unwrap();
        assert!(config.logging.file.is_none());
    }
}
