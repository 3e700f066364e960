//! Coordinate conversion module
//!
//! Provides geographic value types and the Web Mercator math used to turn
//! latitude/longitude into the pixel space that marker clustering runs in.

mod types;

pub use types::{CoordError, GeoBounds, GeoPoint, PixelPoint, MAX_LAT, MIN_LAT};

use std::f64::consts::PI;

/// Edge length of a Web Mercator tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Mean Earth radius in kilometres used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Size of the whole world in pixels at the given (possibly fractional) zoom.
#[inline]
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2.0_f64.powf(zoom)
}

/// Converts a geographic position to global Web Mercator pixel coordinates.
///
/// The origin is the northwest corner of the world (lng -180, lat 85.05).
/// Latitudes beyond the Mercator limit are clamped rather than rejected.
#[inline]
pub fn to_world_pixel(point: GeoPoint, zoom: f64) -> PixelPoint {
    let size = world_size(zoom);
    let lat = point.lat.clamp(MIN_LAT, MAX_LAT);

    let x = (point.lng + 180.0) / 360.0 * size;

    let lat_rad = lat * PI / 180.0;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;

    PixelPoint::new(x, y)
}

/// Converts global Web Mercator pixel coordinates back to a geographic position.
#[inline]
pub fn from_world_pixel(pixel: PixelPoint, zoom: f64) -> GeoPoint {
    let size = world_size(zoom);

    let lng = pixel.x / size * 360.0 - 180.0;

    let y = pixel.y / size;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    GeoPoint::new(lat, lng)
}

/// Wraps a longitude into `[-180, 180)`.
#[inline]
pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance between two points in kilometres (haversine).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Formats a distance for display: metres below one kilometre, otherwise
/// kilometres with one decimal.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km", km)
    }
}
