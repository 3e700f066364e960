//! Cluster engine configuration.

// ==================== Defaults ====================

/// Default edge length of a grid cell in pixels.
pub const DEFAULT_GRID_SIZE: f64 = 80.0;

/// Default minimum member count for a group to collapse into a glyph.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 3;

/// Default zoom level at and above which clustering is bypassed.
pub const DEFAULT_MAX_ZOOM_FOR_CLUSTERING: f64 = 15.0;

/// Default availability ratio at and above which a glyph is green.
pub const DEFAULT_GREEN_MIN_RATIO: f64 = 0.5;

/// Default availability ratio at and above which a glyph is amber.
///
/// Ratios below this are red.
pub const DEFAULT_AMBER_MIN_RATIO: f64 = 0.2;

/// Availability ratio boundaries for glyph coloring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorThresholds {
    /// Ratio at or above which a cluster is green.
    pub green_min: f64,
    /// Ratio at or above which a cluster is amber (when not green).
    pub amber_min: f64,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            green_min: DEFAULT_GREEN_MIN_RATIO,
            amber_min: DEFAULT_AMBER_MIN_RATIO,
        }
    }
}

/// Configuration for [`ClusterEngine`](super::ClusterEngine).
///
/// Fixed once the engine is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Pixel edge length of a grid cell.
    ///
    /// Default: 80 px.
    pub grid_size: f64,

    /// Minimum member count for a group to aggregate (inclusive).
    ///
    /// Default: 3.
    pub min_cluster_size: usize,

    /// Zoom level at/above which every marker is shown individually.
    ///
    /// Default: 15.
    pub max_zoom_for_clustering: f64,

    /// Glyph color boundaries.
    pub colors: ColorThresholds,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            max_zoom_for_clustering: DEFAULT_MAX_ZOOM_FOR_CLUSTERING,
            colors: ColorThresholds::default(),
        }
    }
}

impl ClusterConfig {
    /// Set the grid cell size in pixels.
    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the minimum cluster size.
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    /// Set the zoom level at which clustering stops.
    pub fn with_max_zoom_for_clustering(mut self, zoom: f64) -> Self {
        self.max_zoom_for_clustering = zoom;
        self
    }

    /// Set the color thresholds.
    pub fn with_colors(mut self, colors: ColorThresholds) -> Self {
        self.colors = colors;
        self
    }

    /// Replace unusable values with their defaults.
    ///
    /// A zero or negative grid size, a zero cluster size, or a non-positive
    /// zoom limit would make the pass meaningless, so they are treated as
    /// "not configured".
    pub fn normalized(mut self) -> Self {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            self.grid_size = DEFAULT_GRID_SIZE;
        }
        if self.min_cluster_size == 0 {
            self.min_cluster_size = DEFAULT_MIN_CLUSTER_SIZE;
        }
        if !(self.max_zoom_for_clustering.is_finite() && self.max_zoom_for_clustering > 0.0) {
            self.max_zoom_for_clustering = DEFAULT_MAX_ZOOM_FOR_CLUSTERING;
        }
        self
    }
}
