//! Glyph appearance derived from a cluster's members.

use std::fmt;

use super::config::ColorThresholds;
use super::marker::Marker;

/// Ratio reported when no member has any charging points.
pub const UNKNOWN_AVAILABILITY_RATIO: f64 = 0.5;

/// Stacking order of cluster glyphs relative to other map overlays.
pub const GLYPH_Z_INDEX: i32 = 200;

/// Running sums of available and total charging points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityTally {
    pub available: u64,
    pub total: u64,
}

impl AvailabilityTally {
    /// Sum availability over a set of markers. Unreported counts add zero.
    pub fn from_markers<'a, I>(markers: I) -> Self
    where
        I: IntoIterator<Item = &'a Marker>,
    {
        markers.into_iter().fold(Self::default(), |mut tally, m| {
            tally.available += u64::from(m.station.available());
            tally.total += u64::from(m.station.total());
            tally
        })
    }

    /// Aggregate availability ratio; 0/0 reads as [`UNKNOWN_AVAILABILITY_RATIO`].
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            UNKNOWN_AVAILABILITY_RATIO
        } else {
            self.available as f64 / self.total as f64
        }
    }
}

/// Glyph color tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterColor {
    Green,
    Amber,
    Red,
}

impl ClusterColor {
    /// Classify an availability ratio.
    pub fn from_ratio(ratio: f64, thresholds: &ColorThresholds) -> Self {
        if ratio >= thresholds.green_min {
            ClusterColor::Green
        } else if ratio >= thresholds.amber_min {
            ClusterColor::Amber
        } else {
            ClusterColor::Red
        }
    }

    /// CSS hex color of the glyph background.
    pub fn hex(&self) -> &'static str {
        match self {
            ClusterColor::Green => "#10b981",
            ClusterColor::Amber => "#f59e0b",
            ClusterColor::Red => "#ef4444",
        }
    }
}

impl fmt::Display for ClusterColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClusterColor::Green => "green",
            ClusterColor::Amber => "amber",
            ClusterColor::Red => "red",
        };
        f.write_str(name)
    }
}

/// Glyph diameter for a member count: 50 px up to 50 members, 60 px up to
/// 100, 70 px beyond.
pub fn diameter_for_count(count: usize) -> u32 {
    match count {
        0..=50 => 50,
        51..=100 => 60,
        _ => 70,
    }
}

/// Everything a map surface needs to draw a cluster glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphStyle {
    /// Number of stations behind the glyph.
    pub count: usize,
    /// Circle diameter in pixels.
    pub diameter_px: u32,
    /// Background color tier.
    pub color: ClusterColor,
    /// Aggregate availability ratio the color was derived from.
    pub ratio: f64,
}

impl GlyphStyle {
    /// Derive the style for a group of markers.
    pub fn for_members(members: &[&Marker], thresholds: &ColorThresholds) -> Self {
        let ratio = AvailabilityTally::from_markers(members.iter().copied()).ratio();
        Self {
            count: members.len(),
            diameter_px: diameter_for_count(members.len()),
            color: ClusterColor::from_ratio(ratio, thresholds),
            ratio,
        }
    }

    /// Pixel offset that centers the circle on its anchor position.
    pub fn anchor_offset(&self) -> (f64, f64) {
        let half = f64::from(self.diameter_px) / 2.0;
        (-half, -half)
    }

    /// Font size of the count label.
    pub fn label_font_px(&self) -> u32 {
        if self.diameter_px > 60 {
            22
        } else {
            18
        }
    }

    /// Stacking order of the glyph.
    pub fn z_index(&self) -> i32 {
        GLYPH_Z_INDEX
    }
}
