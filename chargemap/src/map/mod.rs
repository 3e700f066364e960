//! Map surfaces.
//!
//! [`HeadlessMap`] stands in for a real map SDK: it keeps a Web Mercator
//! camera and the set of visuals the cluster engine has placed.

mod headless;

pub use headless::{
    HeadlessMap, PlacedVisual, ViewportConfig, DEFAULT_CENTER, DEFAULT_HEIGHT_PX, DEFAULT_WIDTH_PX,
    DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM,
};
