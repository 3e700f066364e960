//! `chargemap cluster`: run a clustering pass over a station file.

use std::path::PathBuf;
use std::time::Instant;

use chargemap::cluster::{ClusterEngine, ClusterPass};
use chargemap::config::ConfigFile;
use chargemap::coord::GeoPoint;
use chargemap::map::HeadlessMap;
use chargemap::station::{load_snapshots, FeedMessage, StationRegistry};
use clap::Args;
use tracing::info;

use super::common::parse_lat_lng;
use super::output::Output;
use crate::error::CliError;

/// How many individually shown stations to list before summarising.
const MAX_LISTED_MARKERS: usize = 20;

/// Arguments for `chargemap cluster`.
#[derive(Debug, Args)]
pub struct ClusterArgs {
    /// Station snapshot file (JSON array)
    pub stations: PathBuf,

    /// Map zoom level (overrides map.zoom)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Map center as LAT,LNG (overrides map.center_lat/center_lng)
    #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
    pub center: Option<GeoPoint>,

    /// Push message to apply before clustering
    #[arg(long)]
    pub updates: Option<PathBuf>,

    /// Click the Nth glyph (1-based) and recluster at the new view
    #[arg(long)]
    pub click: Option<usize>,

    /// Minimum stations per cluster (overrides cluster.min_cluster_size)
    #[arg(long)]
    pub min_cluster_size: Option<usize>,

    /// Grid cell size in pixels (overrides cluster.grid_size)
    #[arg(long)]
    pub grid_size: Option<f64>,
}

/// Run the cluster command.
pub fn run(args: ClusterArgs, config: &ConfigFile, out: &dyn Output) -> Result<(), CliError> {
    let mut registry = StationRegistry::from_snapshots(load_snapshots(&args.stations)?);
    info!(stations = registry.len(), path = %args.stations.display(), "Loaded stations");

    if let Some(path) = &args.updates {
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        let message = FeedMessage::parse(&json)?;
        if registry.apply_message(&message, Instant::now()) {
            out.println(&format!("Applied updates from {}", path.display()));
        } else {
            out.println(&format!("No station changes in {}", path.display()));
        }
    }

    let mut viewport = config.viewport_config();
    if let Some(zoom) = args.zoom {
        viewport = viewport.with_zoom(zoom);
    }
    if let Some(center) = args.center {
        viewport = viewport.with_center(center);
    }

    let mut cluster_config = config.cluster_config();
    if let Some(size) = args.min_cluster_size {
        cluster_config = cluster_config.with_min_cluster_size(size);
    }
    if let Some(size) = args.grid_size {
        cluster_config = cluster_config.with_grid_size(size);
    }

    let mut map = HeadlessMap::new(viewport);
    let mut engine = ClusterEngine::new(cluster_config);
    let pass = engine.replace_markers(&mut map, registry.markers());
    print_pass(out, &pass, &engine, &map, &registry);

    if let Some(n) = args.click {
        let glyph = n
            .checked_sub(1)
            .and_then(|i| engine.glyphs().get(i))
            .ok_or_else(|| {
                CliError::Usage(format!(
                    "No glyph #{} (this view has {} glyphs)",
                    n,
                    engine.glyphs().len()
                ))
            })?;
        let handle = glyph.handle;
        engine.handle_glyph_click(&mut map, handle);

        out.newline();
        out.println(&format!("Clicked glyph #{}", n));
        out.newline();
        let pass = engine.recluster(&mut map);
        print_pass(out, &pass, &engine, &map, &registry);
    }

    engine.destroy(&mut map);
    Ok(())
}

fn print_pass(
    out: &dyn Output,
    pass: &ClusterPass,
    engine: &ClusterEngine,
    map: &HeadlessMap,
    registry: &StationRegistry,
) {
    out.header("Viewport");
    out.indented(&format!("center  {}", map.center()));
    out.indented(&format!("zoom    {:.1}", map.zoom()));
    let (width, height) = map.size();
    out.indented(&format!("size    {}x{} px", width, height));
    out.indented(&format!("bounds  {}", map.visible_bounds()));
    out.indented(&format!("pass    {}", pass));
    out.newline();

    if !engine.glyphs().is_empty() {
        out.header("Clusters");
        for (i, glyph) in engine.glyphs().iter().enumerate() {
            out.indented(&format!(
                "#{:<3} {}  {:>4} stations  {:>3.0}% available  {}  {}px",
                i + 1,
                glyph.center,
                glyph.style.count,
                glyph.style.ratio * 100.0,
                out.color_label(glyph.style.color),
                glyph.style.diameter_px,
            ));
        }
        out.newline();
    }

    let shown: Vec<_> = engine.markers().filter(|m| m.visible).collect();
    if shown.is_empty() {
        return;
    }
    out.header("Stations");
    for marker in shown.iter().take(MAX_LISTED_MARKERS) {
        let id = &marker.station.id;
        let name = registry.get(id).map(|s| s.name.as_str()).unwrap_or("");
        out.indented(&format!(
            "{:<12} {:<24} {}/{} available",
            id,
            name,
            marker.station.available(),
            marker.station.total(),
        ));
    }
    if shown.len() > MAX_LISTED_MARKERS {
        out.indented(&format!("... and {} more", shown.len() - MAX_LISTED_MARKERS));
    }
}
