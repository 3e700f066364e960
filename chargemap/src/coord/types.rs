//! Coordinate value types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum latitude representable in Web Mercator (degrees).
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator (degrees).
pub const MIN_LAT: f64 = -85.05112878;

/// Errors produced when validating geographic coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside -90..=90.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north).
    pub lat: f64,
    /// Longitude in degrees (positive east).
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point without validating its range.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a point, rejecting latitudes/longitudes outside the globe.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, CoordError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A position in screen/container pixel space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geographic bounding box.
///
/// Bounds are inclusive on every edge, matching how the station API filters
/// by viewport. A box whose `min_lng` is greater than its `max_lng` spans the
/// antimeridian, running east from `min_lng` through 180 to `max_lng`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lng: f64,
    /// Maximum (easternmost) longitude
    pub max_lng: f64,
}

impl GeoBounds {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p.lat, p.lat, p.lng, p.lng),
                Some(b) => Self::new(
                    b.min_lat.min(p.lat),
                    b.max_lat.max(p.lat),
                    b.min_lng.min(p.lng),
                    b.max_lng.max(p.lng),
                ),
            })
        })
    }

    /// Whether the box wraps past longitude 180.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng > self.max_lng
    }

    /// Whether the point lies inside or on the edge of the box.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let in_lat = point.lat >= self.min_lat && point.lat <= self.max_lat;
        let in_lng = if self.crosses_antimeridian() {
            point.lng >= self.min_lng || point.lng <= self.max_lng
        } else {
            point.lng >= self.min_lng && point.lng <= self.max_lng
        };
        in_lat && in_lng
    }

    /// Center of the box.
    pub fn center(&self) -> GeoPoint {
        let lng = if self.crosses_antimeridian() {
            super::wrap_lng((self.min_lng + self.max_lng + 360.0) / 2.0)
        } else {
            (self.min_lng + self.max_lng) / 2.0
        };
        GeoPoint::new((self.min_lat + self.max_lat) / 2.0, lng)
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.4}..{:.4}, {:.4}..{:.4}]",
            self.min_lat, self.max_lat, self.min_lng, self.max_lng
        )
    }
}
