//! `chargemap search`: find stations by name or address.

use std::path::PathBuf;

use chargemap::station::{load_snapshots, StationRegistry, DEFAULT_SEARCH_LIMIT};
use clap::Args;

use super::output::Output;
use crate::error::CliError;

/// Arguments for `chargemap search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Station snapshot file (JSON array)
    pub stations: PathBuf,

    /// Text to look for in station names and addresses
    pub keyword: String,

    /// Maximum number of stations to list
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,
}

/// Run the search command.
pub fn run(args: SearchArgs, out: &dyn Output) -> Result<(), CliError> {
    let registry = StationRegistry::from_snapshots(load_snapshots(&args.stations)?);
    let found = registry.search(&args.keyword, args.limit);

    out.header(&format!("Stations matching \"{}\"", args.keyword));
    if found.is_empty() {
        out.indented("(none)");
        return Ok(());
    }
    for station in found {
        out.indented(&format!(
            "{:<12} {:<24} {:<32} {}/{} available",
            station.id,
            station.name,
            station.address,
            station.available_count.unwrap_or(0),
            station.total_count.unwrap_or(0),
        ));
    }
    Ok(())
}
