//! Chargemap command line.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::{debug, warn};

use chargemap::config::ConfigFile;
use chargemap::logging::init_logging;
use commands::cluster::ClusterArgs;
use commands::common::{load_config, resolve_config_path};
use commands::config::ConfigCommands;
use commands::nearby::NearbyArgs;
use commands::output::ConsoleOutput;
use commands::search::SearchArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "chargemap")]
#[command(version, about = "Cluster and inspect charging-station data", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Cluster stations for a map view and print the result
    Cluster(ClusterArgs),

    /// List the stations closest to a point
    Nearby(NearbyArgs),

    /// Find stations by name or address
    Search(SearchArgs),

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = resolve_config_path(cli.config.as_deref());
    let (config, load_error) = match load_config(&config_path) {
        Ok(config) => (config, None),
        // Config commands must still run so a broken file can be fixed.
        Err(e) if matches!(cli.command, Commands::Config { .. }) => {
            (ConfigFile::default(), Some(e))
        }
        Err(e) => return Err(e),
    };

    let mut logging = config.logging_options();
    if cli.verbose {
        logging = logging.verbose();
    }
    let _guard = init_logging(&logging)?;
    match load_error {
        Some(e) => warn!(config = %config_path.display(), error = %e, "Using default configuration"),
        None => debug!(config = %config_path.display(), "Configuration loaded"),
    }

    let out = ConsoleOutput;
    match cli.command {
        Commands::Cluster(args) => commands::cluster::run(args, &config, &out),
        Commands::Nearby(args) => commands::nearby::run(args, &config, &out),
        Commands::Search(args) => commands::search::run(args, &out),
        Commands::Config { command } => commands::config::run(command, &config_path, &out),
    }
}
