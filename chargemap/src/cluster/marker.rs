//! Markers and their station payload.

use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;

/// Availability snapshot carried by a marker.
///
/// Counts are optional because upstream station records do not always carry
/// them; a missing count reads as zero wherever it is aggregated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSummary {
    /// Station identifier.
    pub id: String,
    /// Number of free charging points, if reported.
    pub available_count: Option<u32>,
    /// Number of charging points, if reported.
    pub total_count: Option<u32>,
}

impl StationSummary {
    /// Create a summary with both counts reported.
    pub fn new(id: impl Into<String>, available_count: u32, total_count: u32) -> Self {
        Self {
            id: id.into(),
            available_count: Some(available_count),
            total_count: Some(total_count),
        }
    }

    /// Create a summary with no availability data.
    pub fn unreported(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            available_count: None,
            total_count: None,
        }
    }

    /// Free charging points, zero when unreported.
    pub fn available(&self) -> u32 {
        self.available_count.unwrap_or(0)
    }

    /// Total charging points, zero when unreported.
    pub fn total(&self) -> u32 {
        self.total_count.unwrap_or(0)
    }
}

/// A station marker placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Geographic position of the station.
    pub position: GeoPoint,
    /// Availability payload, used only for cluster coloring.
    pub station: StationSummary,
    /// Whether the marker is currently shown on its own.
    ///
    /// Maintained by the cluster engine; a freshly built marker starts hidden.
    pub visible: bool,
}

impl Marker {
    /// Create a hidden marker.
    pub fn new(position: GeoPoint, station: StationSummary) -> Self {
        Self {
            position,
            station,
            visible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counts_default_to_zero() {
        let summary = StationSummary::unreported("station_1");
        assert_eq!(summary.available(), 0);
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_partial_counts() {
        let summary = StationSummary {
            id: "station_2".to_string(),
            available_count: None,
            total_count: Some(8),
        };
        assert_eq!(summary.available(), 0);
        assert_eq!(summary.total(), 8);
    }

    #[test]
    fn test_new_marker_starts_hidden() {
        let marker = Marker::new(
            GeoPoint::new(31.82, 117.22),
            StationSummary::new("station_3", 2, 10),
        );
        assert!(!marker.visible);
        assert_eq!(marker.station.available(), 2);
    }
}
