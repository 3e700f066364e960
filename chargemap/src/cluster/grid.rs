//! Pixel-grid partitioning of markers.
//!
//! Markers are bucketed by the screen-space grid cell their projected
//! position falls into. The partition depends on the viewport, so it is
//! recomputed from scratch on every pass.

use std::collections::HashMap;
use std::fmt;

use super::marker::Marker;
use super::surface::MapSurface;
use crate::coord::{GeoPoint, PixelPoint};

/// A square cell of screen pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

impl GridCell {
    /// Cell containing a pixel position.
    #[inline]
    pub fn from_pixel(pixel: PixelPoint, grid_size: f64) -> Self {
        Self {
            x: (pixel.x / grid_size).floor() as i64,
            y: (pixel.y / grid_size).floor() as i64,
        }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// Markers sharing one grid cell during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// The cell the members fell into.
    pub cell: GridCell,
    /// Indices into the marker slice that was partitioned, in input order.
    pub members: Vec<usize>,
    /// Mean position of the members.
    pub center: GeoPoint,
}

impl Cluster {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters produced by [`partition`].
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Arithmetic mean of the given positions.
///
/// Returns `None` for an empty input.
pub fn centroid<I>(positions: I) -> Option<GeoPoint>
where
    I: IntoIterator<Item = GeoPoint>,
{
    let (count, lat, lng) = positions
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lng), p| {
            (n + 1, lat + p.lat, lng + p.lng)
        });

    if count == 0 {
        return None;
    }
    Some(GeoPoint::new(lat / count as f64, lng / count as f64))
}

/// Partition markers by the grid cell of their projected position.
///
/// Every marker lands in exactly one cluster. Clusters are ordered by the
/// first marker that opened their cell, and members keep input order, so the
/// same markers in the same viewport always give the same result.
pub fn partition<S>(markers: &[Marker], surface: &S, grid_size: f64) -> Vec<Cluster>
where
    S: MapSurface + ?Sized,
{
    let mut slots: HashMap<GridCell, usize> = HashMap::new();
    let mut groups: Vec<(GridCell, Vec<usize>)> = Vec::new();

    for (index, marker) in markers.iter().enumerate() {
        let pixel = surface.project_to_pixel(marker.position);
        let cell = GridCell::from_pixel(pixel, grid_size);

        let slot = *slots.entry(cell).or_insert_with(|| {
            groups.push((cell, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(index);
    }

    groups
        .into_iter()
        .filter_map(|(cell, members)| {
            let center = centroid(members.iter().map(|&i| markers[i].position))?;
            Some(Cluster {
                cell,
                members,
                center,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::marker::StationSummary;
    use crate::cluster::surface::{RenderSpec, VisualHandle};

    /// Equirectangular projection: one degree is `scale` pixels.
    struct FlatSurface {
        scale: f64,
    }

    impl MapSurface for FlatSurface {
        fn current_zoom(&self) -> f64 {
            10.0
        }

        fn project_to_pixel(&self, position: GeoPoint) -> PixelPoint {
            PixelPoint::new(position.lng * self.scale, -position.lat * self.scale)
        }

        fn create_visual(&mut self, _position: GeoPoint, _spec: RenderSpec) -> VisualHandle {
            VisualHandle(0)
        }

        fn remove_visual(&mut self, _handle: VisualHandle) {}

        fn set_zoom_and_center(&mut self, _zoom: f64, _center: GeoPoint) {}
    }

    fn marker_at(lat: f64, lng: f64) -> Marker {
        Marker::new(GeoPoint::new(lat, lng), StationSummary::unreported("s"))
    }

    #[test]
    fn test_cell_floors_negative_pixels() {
        assert_eq!(
            GridCell::from_pixel(PixelPoint::new(-1.0, 79.9), 80.0),
            GridCell { x: -1, y: 0 }
        );
        assert_eq!(
            GridCell::from_pixel(PixelPoint::new(160.0, -160.0), 80.0),
            GridCell { x: 2, y: -2 }
        );
    }

    #[test]
    fn test_empty_input_gives_no_clusters() {
        let surface = FlatSurface { scale: 100.0 };
        assert!(partition(&[], &surface, 80.0).is_empty());
    }

    #[test]
    fn test_groups_by_cell_in_first_seen_order() {
        let surface = FlatSurface { scale: 100.0 };
        // x pixels: 10, 500, 20, 510, 30
        let markers = vec![
            marker_at(-0.1, 0.1),
            marker_at(-0.1, 5.0),
            marker_at(-0.1, 0.2),
            marker_at(-0.1, 5.1),
            marker_at(-0.1, 0.3),
        ];

        let clusters = partition(&markers, &surface, 80.0);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 2, 4]);
        assert_eq!(clusters[1].members, vec![1, 3]);
        assert_eq!(clusters[0].cell, GridCell { x: 0, y: 0 });
        assert_eq!(clusters[1].cell, GridCell { x: 6, y: 0 });
    }

    #[test]
    fn test_center_is_mean_position() {
        let surface = FlatSurface { scale: 1.0 };
        let markers = vec![marker_at(-1.0, 1.0), marker_at(-3.0, 5.0)];

        let clusters = partition(&markers, &surface, 80.0);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].center, GeoPoint::new(-2.0, 3.0));
    }

    #[test]
    fn test_centroid_of_nothing() {
        assert!(centroid(Vec::<GeoPoint>::new()).is_none());
    }

    #[test]
    fn test_cell_key_display() {
        assert_eq!(GridCell { x: 3, y: -4 }.to_string(), "3_-4");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_every_marker_in_exactly_one_cluster(
                points in prop::collection::vec((-10.0..10.0_f64, -10.0..10.0_f64), 0..200),
                scale in 1.0..500.0_f64,
                grid_size in 10.0..200.0_f64
            ) {
                let surface = FlatSurface { scale };
                let markers: Vec<Marker> =
                    points.iter().map(|&(lat, lng)| marker_at(lat, lng)).collect();

                let clusters = partition(&markers, &surface, grid_size);

                let mut seen = vec![0usize; markers.len()];
                for cluster in &clusters {
                    prop_assert!(!cluster.is_empty());
                    for &i in &cluster.members {
                        seen[i] += 1;
                        let cell = GridCell::from_pixel(
                            surface.project_to_pixel(markers[i].position),
                            grid_size,
                        );
                        prop_assert_eq!(cell, cluster.cell);
                    }
                }
                prop_assert!(seen.iter().all(|&n| n == 1));
            }

            #[test]
            fn test_partition_is_deterministic(
                points in prop::collection::vec((-5.0..5.0_f64, -5.0..5.0_f64), 0..100)
            ) {
                let surface = FlatSurface { scale: 50.0 };
                let markers: Vec<Marker> =
                    points.iter().map(|&(lat, lng)| marker_at(lat, lng)).collect();

                prop_assert_eq!(
                    partition(&markers, &surface, 80.0),
                    partition(&markers, &surface, 80.0)
                );
            }
        }
    }
}
