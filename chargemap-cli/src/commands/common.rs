//! Helpers shared by command handlers.

use std::path::{Path, PathBuf};

use chargemap::config::{config_file_path, ConfigError, ConfigFile};
use chargemap::coord::GeoPoint;
use tracing::warn;

use crate::error::CliError;

/// Parse a `LAT,LNG` pair, e.g. `31.8206,117.2272`.
pub fn parse_lat_lng(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;
    GeoPoint::try_new(lat, lng).map_err(|e| e.to_string())
}

/// Config file to use: the `--config` override or the default location.
pub fn resolve_config_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    match ConfigFile::load_from(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(_)) => Ok(ConfigFile::default()),
        Err(e) => Err(e.into()),
    }
}

/// Load the config file for inspection or repair.
///
/// A file that does not load is reported and replaced by defaults.
pub fn load_config_or_default(path: &Path) -> ConfigFile {
    load_config(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Ignoring unusable configuration file");
        ConfigFile::default()
    })
}
