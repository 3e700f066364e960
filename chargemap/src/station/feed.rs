//! Parsing of station snapshots and push-channel messages.
//!
//! The transport (HTTP polling, WebSocket push) lives outside this crate;
//! these helpers only turn its JSON payloads into typed values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::model::{StationSnapshot, StatusUpdate};

/// Errors that can occur while reading station data.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to read a station file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not valid station JSON.
    #[error("Invalid station data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON array of station snapshots.
pub fn parse_snapshots(json: &str) -> Result<Vec<StationSnapshot>, FeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a JSON array of station snapshots from a file.
pub fn load_snapshots(path: &Path) -> Result<Vec<StationSnapshot>, FeedError> {
    let json = fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshots(&json)
}

/// A message received on the station push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Availability changed for some stations.
    StationStatusUpdate(Vec<StatusUpdate>),
    /// Prices were recomputed; carries the server timestamp if present.
    PriceUpdate { timestamp: Option<u64> },
    /// Keep-alive.
    Heartbeat,
    /// A message type this crate does not handle.
    Other(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct StatusPayload {
    updates: Vec<StatusUpdate>,
}

#[derive(Deserialize)]
struct PricePayload {
    #[serde(default)]
    timestamp: Option<u64>,
}

impl FeedMessage {
    /// Parse a `{"type": ..., "payload": ...}` envelope.
    pub fn parse(json: &str) -> Result<Self, FeedError> {
        let envelope: Envelope = serde_json::from_str(json)?;
        let message = match envelope.kind.as_str() {
            "station_status_update" => {
                let payload: StatusPayload = serde_json::from_value(envelope.payload)?;
                FeedMessage::StationStatusUpdate(payload.updates)
            }
            "price_update" => {
                let timestamp = if envelope.payload.is_null() {
                    None
                } else {
                    serde_json::from_value::<PricePayload>(envelope.payload)?.timestamp
                };
                FeedMessage::PriceUpdate { timestamp }
            }
            "heartbeat" => FeedMessage::Heartbeat,
            _ => FeedMessage::Other(envelope.kind),
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::station::model::StationStatus;

    #[test]
    fn test_parse_snapshot_array() {
        let json = r#"[
            {"id": "a", "lat": 31.8, "lng": 117.2, "availableCount": 1, "totalCount": 4},
            {"id": "b", "lat": 31.9, "lng": 117.3}
        ]"#;

        let stations = parse_snapshots(json).unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].total_count, Some(4));
        assert_eq!(stations[1].total_count, None);
    }

    #[test]
    fn test_non_array_is_rejected() {
        let err = parse_snapshots(r#"{"stations": []}"#).unwrap_err();
        assert!(matches!(err, FeedError::Json(_)));
        assert!(err.to_string().contains("Invalid station data"));
    }

    #[test]
    fn test_load_snapshots_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "x", "lat": 1.0, "lng": 2.0}}]"#).unwrap();

        let stations = load_snapshots(file.path()).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "x");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = load_snapshots(&path).unwrap_err();

        assert!(matches!(err, FeedError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_parse_status_update_message() {
        let json = r#"{
            "type": "station_status_update",
            "payload": {"updates": [
                {"id": "a", "status": "busy", "availableCount": 0, "chargingCount": 4, "totalCount": 4},
                {"id": "b", "availableCount": 2}
            ]}
        }"#;

        let FeedMessage::StationStatusUpdate(updates) = FeedMessage::parse(json).unwrap() else {
            panic!("expected status update");
        };

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].status, Some(StationStatus::Busy));
        assert_eq!(updates[1].status, None);
        assert_eq!(updates[1].available_count, Some(2));
    }

    #[test]
    fn test_parse_price_update() {
        let msg = FeedMessage::parse(r#"{"type": "price_update", "payload": {"timestamp": 1700000000000}}"#)
            .unwrap();
        assert_eq!(
            msg,
            FeedMessage::PriceUpdate {
                timestamp: Some(1_700_000_000_000)
            }
        );

        let bare = FeedMessage::parse(r#"{"type": "price_update"}"#).unwrap();
        assert_eq!(bare, FeedMessage::PriceUpdate { timestamp: None });
    }

    #[test]
    fn test_parse_heartbeat_and_unknown() {
        assert_eq!(
            FeedMessage::parse(r#"{"type": "heartbeat", "timestamp": 1}"#).unwrap(),
            FeedMessage::Heartbeat
        );
        assert_eq!(
            FeedMessage::parse(r#"{"type": "subscribe", "payload": {}}"#).unwrap(),
            FeedMessage::Other("subscribe".to_string())
        );
    }

    #[test]
    fn test_status_update_without_updates_is_error() {
        let err = FeedMessage::parse(r#"{"type": "station_status_update", "payload": {}}"#);
        assert!(err.is_err());
    }
}
