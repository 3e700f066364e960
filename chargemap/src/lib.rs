//! Chargemap - charging-station map core
//!
//! This library provides the non-UI core of a charging-station map:
//! client-side marker clustering against a pluggable map surface, a headless
//! Web Mercator map for tools and tests, and typed handling of the station
//! data feed.
//!
//! # Architecture
//!
//! ```text
//! station JSON ──► StationRegistry ──► Vec<Marker> ──► ClusterEngine ──► MapSurface
//!      ▲                                                   │    ▲            │
//! push messages                                   glyph click   └─ recluster ┘
//!                                                              after viewport change
//! ```

pub mod cluster;
pub mod config;
pub mod coord;
pub mod logging;
pub mod map;
pub mod station;
