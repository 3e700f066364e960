//! Station records as delivered by the station API and push channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cluster::{Marker, StationSummary};
use crate::coord::GeoPoint;

/// Operational state of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    Available,
    Busy,
    Offline,
    Maintenance,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StationStatus::Available => "available",
            StationStatus::Busy => "busy",
            StationStatus::Offline => "offline",
            StationStatus::Maintenance => "maintenance",
            StationStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Full snapshot of one charging station.
///
/// Unknown JSON fields (pricing, operator, amenities) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: StationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charging_count: Option<u32>,
}

impl StationSnapshot {
    /// Geographic position of the station.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Availability payload for a map marker.
    pub fn summary(&self) -> StationSummary {
        StationSummary {
            id: self.id.clone(),
            available_count: self.available_count,
            total_count: self.total_count,
        }
    }

    /// Build a (hidden) map marker for this station.
    pub fn to_marker(&self) -> Marker {
        Marker::new(self.position(), self.summary())
    }

    /// Whether a driver can plug in right now.
    pub fn is_available(&self) -> bool {
        self.status == StationStatus::Available && self.available_count.unwrap_or(0) > 0
    }

    /// Merge the fields present in `update`.
    pub fn apply(&mut self, update: &StatusUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(n) = update.available_count {
            self.available_count = Some(n);
        }
        if let Some(n) = update.charging_count {
            self.charging_count = Some(n);
        }
        if let Some(n) = update.total_count {
            self.total_count = Some(n);
        }
    }
}

/// Partial availability update for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charging_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
}
