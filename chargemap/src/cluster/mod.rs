//! Viewport marker clustering.
//!
//! Station markers are bucketed by the pixel-grid cell they project into at
//! the current zoom. Dense cells collapse into a single glyph colored by the
//! cell's aggregate availability; sparse cells show their markers as-is.
//!
//! # Pass
//!
//! ```text
//! zoom >= max_zoom_for_clustering ──► show every marker, no glyphs
//!            │
//!            ▼
//! project ─► GridCell (floor(px / grid_size)) ─► group
//!                                                  │
//!                       members >= min_cluster_size│members < min_cluster_size
//!                                 ▼                ▼
//!                      hide members + glyph    show members
//! ```
//!
//! # Example
//!
//! ```
//! use chargemap::cluster::{ClusterConfig, ClusterEngine, Marker, StationSummary};
//! use chargemap::coord::GeoPoint;
//! use chargemap::map::HeadlessMap;
//!
//! let mut map = HeadlessMap::default();
//! let mut engine = ClusterEngine::new(ClusterConfig::default());
//!
//! let markers = vec![Marker::new(
//!     GeoPoint::new(31.8206, 117.2272),
//!     StationSummary::new("station_1", 3, 8),
//! )];
//! let pass = engine.replace_markers(&mut map, markers);
//! assert_eq!(pass.individual_markers, 1);
//!
//! engine.destroy(&mut map);
//! ```

mod config;
mod engine;
mod grid;
mod marker;
mod style;
mod surface;

pub use config::{
    ClusterConfig, ColorThresholds, DEFAULT_AMBER_MIN_RATIO, DEFAULT_GREEN_MIN_RATIO,
    DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM_FOR_CLUSTERING, DEFAULT_MIN_CLUSTER_SIZE,
};
pub use engine::{ClusterEngine, ClusterGlyph, ClusterPass, GLYPH_CLICK_ZOOM_STEP};
pub use grid::{centroid, partition, Cluster, GridCell};
pub use marker::{Marker, StationSummary};
pub use style::{
    diameter_for_count, AvailabilityTally, ClusterColor, GlyphStyle, GLYPH_Z_INDEX,
    UNKNOWN_AVAILABILITY_RATIO,
};
pub use surface::{MapSurface, RenderSpec, VisualHandle};
