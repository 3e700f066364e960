//! The map capability the cluster engine draws through.
//!
//! The engine never talks to a concrete map SDK. Anything that can report its
//! zoom, project coordinates to container pixels, add/remove visuals and move
//! its camera can host clustered markers: a real SDK adapter in an app, or
//! [`HeadlessMap`](crate::map::HeadlessMap) in tools and tests.

use std::fmt;

use super::marker::StationSummary;
use super::style::GlyphStyle;
use crate::coord::{GeoPoint, PixelPoint};

/// Opaque handle to a visual owned by a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

impl fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// What a visual should look like.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSpec {
    /// An individual station marker.
    Station(StationSummary),
    /// An aggregate cluster glyph.
    Glyph(GlyphStyle),
}

impl RenderSpec {
    /// Whether this spec describes a cluster glyph.
    pub fn is_glyph(&self) -> bool {
        matches!(self, RenderSpec::Glyph(_))
    }
}

/// Capabilities the cluster engine consumes from a map.
///
/// Implementations are expected to succeed; the engine neither retries nor
/// checks these calls.
pub trait MapSurface {
    /// Current zoom level (may be fractional).
    fn current_zoom(&self) -> f64;

    /// Project a geographic position to container pixel coordinates at the
    /// current viewport.
    fn project_to_pixel(&self, position: GeoPoint) -> PixelPoint;

    /// Add a visual at `position` and return its handle.
    fn create_visual(&mut self, position: GeoPoint, spec: RenderSpec) -> VisualHandle;

    /// Remove a visual previously returned by [`create_visual`](Self::create_visual).
    fn remove_visual(&mut self, handle: VisualHandle);

    /// Move the camera.
    fn set_zoom_and_center(&mut self, zoom: f64, center: GeoPoint);
}
