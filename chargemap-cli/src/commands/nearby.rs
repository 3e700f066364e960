//! `chargemap nearby`: list the stations closest to a point.

use std::path::PathBuf;

use chargemap::config::ConfigFile;
use chargemap::coord::{format_distance, GeoPoint};
use chargemap::station::{load_snapshots, StationRegistry, DEFAULT_NEARBY_LIMIT};
use clap::Args;

use super::common::parse_lat_lng;
use super::output::Output;
use crate::error::CliError;

/// Arguments for `chargemap nearby`.
#[derive(Debug, Args)]
pub struct NearbyArgs {
    /// Station snapshot file (JSON array)
    pub stations: PathBuf,

    /// Reference point as LAT,LNG (defaults to the configured map center)
    #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
    pub from: Option<GeoPoint>,

    /// Maximum number of stations to list
    #[arg(long, default_value_t = DEFAULT_NEARBY_LIMIT)]
    pub limit: usize,

    /// Only list stations with a free charging point
    #[arg(long)]
    pub available: bool,
}

/// Run the nearby command.
pub fn run(args: NearbyArgs, config: &ConfigFile, out: &dyn Output) -> Result<(), CliError> {
    let registry = StationRegistry::from_snapshots(load_snapshots(&args.stations)?);
    let origin = args.from.unwrap_or(config.viewport_config().center);

    let ranked = registry.nearby(origin, registry.len());
    let listed: Vec<_> = ranked
        .into_iter()
        .filter(|n| !args.available || n.station.is_available())
        .take(args.limit)
        .collect();

    out.header(&format!("Stations near {}", origin));
    if listed.is_empty() {
        out.indented("(none)");
        return Ok(());
    }
    for (i, nearby) in listed.iter().enumerate() {
        let station = nearby.station;
        out.indented(&format!(
            "{:>2}. {:<8} {:<12} {:<24} {}/{} available  {}",
            i + 1,
            format_distance(nearby.distance_km),
            station.id,
            station.name,
            station.available_count.unwrap_or(0),
            station.total_count.unwrap_or(0),
            station.status,
        ));
    }
    Ok(())
}
