//! Station data feed.
//!
//! Turns station API payloads and push-channel messages into a
//! [`StationRegistry`], which in turn produces the markers the cluster engine
//! works on.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use chargemap::station::{parse_snapshots, FeedMessage, StationRegistry};
//!
//! let stations = parse_snapshots(
//!     r#"[{"id": "a", "lat": 31.82, "lng": 117.22, "availableCount": 2, "totalCount": 8}]"#,
//! )?;
//! let mut registry = StationRegistry::from_snapshots(stations);
//!
//! let msg = FeedMessage::parse(
//!     r#"{"type": "station_status_update", "payload": {"updates": [{"id": "a", "availableCount": 0}]}}"#,
//! )?;
//! assert!(registry.apply_message(&msg, Instant::now()));
//! assert_eq!(registry.markers()[0].station.available(), 0);
//! # Ok::<(), chargemap::station::FeedError>(())
//! ```

mod feed;
mod model;
mod registry;

pub use feed::{load_snapshots, parse_snapshots, FeedError, FeedMessage};
pub use model::{StationSnapshot, StationStatus, StatusUpdate};
pub use registry::{
    NearbyStation, StationRegistry, DEFAULT_NEARBY_LIMIT, DEFAULT_SEARCH_LIMIT, RECENT_UPDATE_WINDOW,
};
