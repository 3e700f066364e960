//! `chargemap config get|set|list|path`.

use std::path::Path;

use chargemap::config::{ConfigFile, ConfigKey};
use clap::Subcommand;

use super::common::load_config_or_default;
use super::output::Output;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., cluster.grid_size)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., map.zoom)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the file at `path`.
///
/// These keep working when the file does not load, so it can be repaired.
pub fn run(command: ConfigCommands, path: &Path, out: &dyn Output) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key, path, out),
        ConfigCommands::Set { key, value } => run_set(&key, &value, path, out),
        ConfigCommands::List => run_list(path, out),
        ConfigCommands::Path => {
            out.println(&path.display().to_string());
            Ok(())
        }
    }
}

fn run_get(key: &str, path: &Path, out: &dyn Output) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse()?;
    let config = load_config_or_default(path);
    let value = config_key.get(&config);

    if value.is_empty() {
        out.println("(not set)");
    } else {
        out.println(&value);
    }
    Ok(())
}

fn run_set(key: &str, value: &str, path: &Path, out: &dyn Output) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse()?;
    let stored = ConfigFile::set_in_file(path, config_key, value)?;

    out.println(&format!("Set {} = {}", config_key, stored));
    Ok(())
}

fn run_list(path: &Path, out: &dyn Output) -> Result<(), CliError> {
    let config = load_config_or_default(path);

    out.header("Configuration Settings");
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            if !current_section.is_empty() {
                out.newline();
            }
            out.println(&format!("[{}]", section));
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            out.indented(&format!("{} = (not set)", key.key_name()));
        } else {
            out.indented(&format!("{} = {}", key.key_name(), value));
        }
    }
    Ok(())
}
