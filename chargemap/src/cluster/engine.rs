//! The cluster engine: owns the active marker set and keeps the map's
//! markers and glyphs in step with the current viewport.
//!
//! A pass runs synchronously to completion. The engine does not watch the
//! viewport; whoever moves the map calls [`ClusterEngine::recluster`]
//! afterwards.

use std::fmt;

use tracing::{debug, info};

use super::config::ClusterConfig;
use super::grid::partition;
use super::marker::Marker;
use super::style::GlyphStyle;
use super::surface::{MapSurface, RenderSpec, VisualHandle};
use crate::coord::GeoPoint;

/// Zoom levels added when a glyph is clicked.
pub const GLYPH_CLICK_ZOOM_STEP: f64 = 2.0;

/// A cluster glyph currently on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGlyph {
    /// Handle of the glyph visual on the surface.
    pub handle: VisualHandle,
    /// Mean position of the members; the glyph is anchored here.
    pub center: GeoPoint,
    /// Indices of the hidden member markers.
    pub members: Vec<usize>,
    /// How the glyph was drawn.
    pub style: GlyphStyle,
}

/// Outcome of one clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClusterPass {
    /// Zoom level the pass ran at.
    pub zoom: f64,
    /// Grid groups formed (zero when bypassed).
    pub groups: usize,
    /// Glyphs created.
    pub glyphs: usize,
    /// Markers shown individually.
    pub individual_markers: usize,
    /// Whether the zoom was at/above the clustering limit.
    pub bypassed: bool,
}

impl fmt::Display for ClusterPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bypassed {
            write!(
                f,
                "zoom {:.1}: clustering bypassed, {} markers shown",
                self.zoom, self.individual_markers
            )
        } else {
            write!(
                f,
                "zoom {:.1}: {} groups, {} glyphs, {} individual markers",
                self.zoom, self.groups, self.glyphs, self.individual_markers
            )
        }
    }
}

#[derive(Debug)]
struct TrackedMarker {
    marker: Marker,
    visual: Option<VisualHandle>,
}

/// Grid-based marker clusterer.
///
/// The surface is passed in on every call. Other code may draw on the same
/// surface; the engine only ever removes visuals it created itself.
#[derive(Debug)]
pub struct ClusterEngine {
    config: ClusterConfig,
    markers: Vec<TrackedMarker>,
    glyphs: Vec<ClusterGlyph>,
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}

impl ClusterEngine {
    /// Create an engine. Unusable config values fall back to defaults.
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            config: config.normalized(),
            markers: Vec::new(),
            glyphs: Vec::new(),
        }
    }

    /// The effective configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// The active marker set.
    pub fn markers(&self) -> impl ExactSizeIterator<Item = &Marker> {
        self.markers.iter().map(|t| &t.marker)
    }

    /// Glyphs rendered by the last pass.
    pub fn glyphs(&self) -> &[ClusterGlyph] {
        &self.glyphs
    }

    /// Number of markers currently shown individually.
    pub fn visible_marker_count(&self) -> usize {
        self.markers.iter().filter(|t| t.marker.visible).count()
    }

    /// Tear down everything drawn so far, adopt `markers` and run a pass.
    pub fn replace_markers<S>(&mut self, surface: &mut S, markers: Vec<Marker>) -> ClusterPass
    where
        S: MapSurface + ?Sized,
    {
        self.clear(surface);
        self.markers = markers
            .into_iter()
            .map(|mut marker| {
                marker.visible = false;
                TrackedMarker {
                    marker,
                    visual: None,
                }
            })
            .collect();
        self.run_pass(surface)
    }

    /// Re-run the pass for the current viewport over the stored markers.
    pub fn recluster<S>(&mut self, surface: &mut S) -> ClusterPass
    where
        S: MapSurface + ?Sized,
    {
        self.run_pass(surface)
    }

    /// Route a click on a visual. If it is one of our glyphs, center on it and
    /// zoom in by [`GLYPH_CLICK_ZOOM_STEP`].
    ///
    /// Returns whether the handle belonged to a glyph. The caller still has to
    /// call [`recluster`](Self::recluster) once the camera has moved.
    pub fn handle_glyph_click<S>(&mut self, surface: &mut S, handle: VisualHandle) -> bool
    where
        S: MapSurface + ?Sized,
    {
        let Some(glyph) = self.glyphs.iter().find(|g| g.handle == handle) else {
            return false;
        };

        let zoom = surface.current_zoom() + GLYPH_CLICK_ZOOM_STEP;
        debug!(
            handle = %handle,
            members = glyph.members.len(),
            zoom,
            "Cluster glyph clicked, zooming in"
        );
        surface.set_zoom_and_center(zoom, glyph.center);
        true
    }

    /// Remove every glyph and marker visual and forget the marker set.
    ///
    /// Safe to call repeatedly; later calls find nothing to remove.
    pub fn destroy<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        self.clear(surface);
        self.markers.clear();
    }

    fn clear<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        self.clear_glyphs(surface);
        for tracked in &mut self.markers {
            hide(surface, tracked);
        }
    }

    fn clear_glyphs<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        for glyph in self.glyphs.drain(..) {
            surface.remove_visual(glyph.handle);
        }
    }

    fn run_pass<S>(&mut self, surface: &mut S) -> ClusterPass
    where
        S: MapSurface + ?Sized,
    {
        self.clear_glyphs(surface);

        let zoom = surface.current_zoom();
        if zoom >= self.config.max_zoom_for_clustering {
            for tracked in &mut self.markers {
                show(surface, tracked);
            }
            let pass = ClusterPass {
                zoom,
                individual_markers: self.markers.len(),
                bypassed: true,
                ..ClusterPass::default()
            };
            debug!(
                zoom,
                limit = self.config.max_zoom_for_clustering,
                markers = pass.individual_markers,
                "Zoom at clustering limit, showing all markers"
            );
            return pass;
        }

        let snapshot: Vec<Marker> = self.markers.iter().map(|t| t.marker.clone()).collect();
        let clusters = partition(&snapshot, &*surface, self.config.grid_size);

        let mut pass = ClusterPass {
            zoom,
            groups: clusters.len(),
            ..ClusterPass::default()
        };

        for cluster in clusters {
            if cluster.len() >= self.config.min_cluster_size {
                for &i in &cluster.members {
                    hide(surface, &mut self.markers[i]);
                }
                let members: Vec<&Marker> = cluster.members.iter().map(|&i| &snapshot[i]).collect();
                let style = GlyphStyle::for_members(&members, &self.config.colors);
                let handle = surface.create_visual(cluster.center, RenderSpec::Glyph(style.clone()));
                self.glyphs.push(ClusterGlyph {
                    handle,
                    center: cluster.center,
                    members: cluster.members,
                    style,
                });
                pass.glyphs += 1;
            } else {
                for &i in &cluster.members {
                    show(surface, &mut self.markers[i]);
                }
                pass.individual_markers += cluster.members.len();
            }
        }

        info!(
            zoom,
            groups = pass.groups,
            glyphs = pass.glyphs,
            individual = pass.individual_markers,
            "Clustering pass complete"
        );
        pass
    }
}

fn show<S>(surface: &mut S, tracked: &mut TrackedMarker)
where
    S: MapSurface + ?Sized,
{
    if tracked.visual.is_none() {
        let spec = RenderSpec::Station(tracked.marker.station.clone());
        tracked.visual = Some(surface.create_visual(tracked.marker.position, spec));
    }
    tracked.marker.visible = true;
}

fn hide<S>(surface: &mut S, tracked: &mut TrackedMarker)
where
    S: MapSurface + ?Sized,
{
    if let Some(handle) = tracked.visual.take() {
        surface.remove_visual(handle);
    }
    tracked.marker.visible = false;
}
