//! In-memory map surface with Web Mercator projection.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::cluster::{GlyphStyle, MapSurface, RenderSpec, VisualHandle};
use crate::coord::{
    from_world_pixel, to_world_pixel, wrap_lng, GeoBounds, GeoPoint, PixelPoint,
};

/// Lowest zoom the map accepts.
pub const MIN_ZOOM: f64 = 2.0;

/// Highest zoom the map accepts.
pub const MAX_ZOOM: f64 = 20.0;

/// Default viewport center (Hefei).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 31.8206,
    lng: 117.2272,
};

/// Default zoom level.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Default viewport width in pixels.
pub const DEFAULT_WIDTH_PX: u32 = 1280;

/// Default viewport height in pixels.
pub const DEFAULT_HEIGHT_PX: u32 = 800;

/// Initial camera and viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub center: GeoPoint,
    pub zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_WIDTH_PX,
            height_px: DEFAULT_HEIGHT_PX,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewportConfig {
    /// Set the viewport size.
    pub fn with_size(mut self, width_px: u32, height_px: u32) -> Self {
        self.width_px = width_px;
        self.height_px = height_px;
        self
    }

    /// Set the initial center.
    pub fn with_center(mut self, center: GeoPoint) -> Self {
        self.center = center;
        self
    }

    /// Set the initial zoom.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }
}

/// A visual currently placed on a [`HeadlessMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedVisual {
    pub position: GeoPoint,
    pub spec: RenderSpec,
}

/// A map surface without a rendering backend.
///
/// Keeps a camera and the set of live visuals so tools and tests can inspect
/// what a real map would be showing.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    width_px: u32,
    height_px: u32,
    center: GeoPoint,
    zoom: f64,
    visuals: BTreeMap<VisualHandle, PlacedVisual>,
    next_handle: u64,
    created: u64,
    removed: u64,
    viewport_revision: u64,
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl HeadlessMap {
    /// Create a map with the given camera. Zoom is clamped to
    /// [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            width_px: config.width_px,
            height_px: config.height_px,
            center: config.center,
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            visuals: BTreeMap::new(),
            next_handle: 1,
            created: 0,
            removed: 0,
            viewport_revision: 0,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Viewport size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Incremented whenever zoom or center changes.
    pub fn viewport_revision(&self) -> u64 {
        self.viewport_revision
    }

    /// Move the camera without changing zoom.
    pub fn pan_to(&mut self, center: GeoPoint) {
        let zoom = self.zoom;
        self.set_zoom_and_center(zoom, center);
    }

    /// Change zoom without moving the camera.
    pub fn zoom_to(&mut self, zoom: f64) {
        let center = self.center;
        self.set_zoom_and_center(zoom, center);
    }

    /// Inverse of [`MapSurface::project_to_pixel`].
    pub fn unproject(&self, pixel: PixelPoint) -> GeoPoint {
        let origin = self.viewport_origin();
        from_world_pixel(
            PixelPoint::new(pixel.x + origin.x, pixel.y + origin.y),
            self.zoom,
        )
    }

    /// Geographic rectangle covered by the viewport.
    ///
    /// Longitudes are wrapped into `[-180, 180)`, so a view across the
    /// antimeridian yields a box with `min_lng > max_lng`. A view wider than
    /// the world covers every longitude.
    pub fn visible_bounds(&self) -> GeoBounds {
        let nw = self.unproject(PixelPoint::new(0.0, 0.0));
        let se = self.unproject(PixelPoint::new(
            f64::from(self.width_px),
            f64::from(self.height_px),
        ));
        if se.lng - nw.lng >= 360.0 {
            return GeoBounds::new(se.lat, nw.lat, -180.0, 180.0);
        }
        GeoBounds::new(se.lat, nw.lat, wrap_lng(nw.lng), wrap_lng(se.lng))
    }

    /// Look up a live visual.
    pub fn visual(&self, handle: VisualHandle) -> Option<&PlacedVisual> {
        self.visuals.get(&handle)
    }

    /// All live visuals in creation order.
    pub fn visuals(&self) -> impl Iterator<Item = (VisualHandle, &PlacedVisual)> {
        self.visuals.iter().map(|(h, v)| (*h, v))
    }

    /// Live cluster glyphs in creation order.
    pub fn glyphs(&self) -> impl Iterator<Item = (VisualHandle, GeoPoint, &GlyphStyle)> {
        self.visuals.iter().filter_map(|(h, v)| match &v.spec {
            RenderSpec::Glyph(style) => Some((*h, v.position, style)),
            RenderSpec::Station(_) => None,
        })
    }

    /// Number of live glyph visuals.
    pub fn glyph_count(&self) -> usize {
        self.visuals.values().filter(|v| v.spec.is_glyph()).count()
    }

    /// Number of live individual station markers.
    pub fn station_marker_count(&self) -> usize {
        self.visuals.values().filter(|v| !v.spec.is_glyph()).count()
    }

    /// Total visuals ever created.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total visuals ever removed.
    pub fn removed_count(&self) -> u64 {
        self.removed
    }

    /// World pixel of the viewport's top-left corner.
    fn viewport_origin(&self) -> PixelPoint {
        let center = to_world_pixel(self.center, self.zoom);
        PixelPoint::new(
            center.x - f64::from(self.width_px) / 2.0,
            center.y - f64::from(self.height_px) / 2.0,
        )
    }
}

impl MapSurface for HeadlessMap {
    fn current_zoom(&self) -> f64 {
        self.zoom
    }

    fn project_to_pixel(&self, position: GeoPoint) -> PixelPoint {
        let origin = self.viewport_origin();
        let world = to_world_pixel(position, self.zoom);
        PixelPoint::new(world.x - origin.x, world.y - origin.y)
    }

    fn create_visual(&mut self, position: GeoPoint, spec: RenderSpec) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.created += 1;
        trace!(handle = %handle, glyph = spec.is_glyph(), "Visual created");
        self.visuals.insert(handle, PlacedVisual { position, spec });
        handle
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            debug!(handle = %handle, "Ignoring removal of unknown visual");
        }
    }

    fn set_zoom_and_center(&mut self, zoom: f64, center: GeoPoint) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.center = center;
        self.viewport_revision += 1;
        debug!(zoom = self.zoom, center = %center, "Viewport changed");
    }
}
