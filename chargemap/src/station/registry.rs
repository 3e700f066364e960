//! The current station set and its live updates.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use super::feed::FeedMessage;
use super::model::{StationSnapshot, StatusUpdate};
use crate::cluster::Marker;
use crate::coord::{haversine_km, GeoBounds, GeoPoint};

/// How long a station counts as "recently updated" after a status change.
pub const RECENT_UPDATE_WINDOW: Duration = Duration::from_secs(3);

/// Default number of stations returned by [`StationRegistry::nearby`].
pub const DEFAULT_NEARBY_LIMIT: usize = 10;

/// Default number of stations returned by [`StationRegistry::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// A station paired with its distance from a reference point.
#[derive(Debug, Clone, Copy)]
pub struct NearbyStation<'a> {
    pub station: &'a StationSnapshot,
    pub distance_km: f64,
}

/// Holds the latest full snapshot set and applies incremental updates.
#[derive(Debug, Default)]
pub struct StationRegistry {
    stations: Vec<StationSnapshot>,
    index: HashMap<String, usize>,
    last_update: HashMap<String, Instant>,
}

impl StationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `stations`.
    pub fn from_snapshots(stations: Vec<StationSnapshot>) -> Self {
        let mut registry = Self::new();
        registry.replace(stations);
        registry
    }

    /// Replace the whole station set.
    ///
    /// Update stamps survive for stations that are still present.
    pub fn replace(&mut self, stations: Vec<StationSnapshot>) {
        self.index = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let index = &self.index;
        self.last_update.retain(|id, _| index.contains_key(id));
        self.stations = stations;
        debug!(stations = self.stations.len(), "Station set replaced");
    }

    /// Apply partial updates. Updates for unknown stations are skipped.
    ///
    /// Returns the number of updates applied.
    pub fn apply_updates(&mut self, updates: &[StatusUpdate], now: Instant) -> usize {
        let mut applied = 0;
        for update in updates {
            match self.index.get(&update.id) {
                Some(&i) => {
                    self.stations[i].apply(update);
                    self.last_update.insert(update.id.clone(), now);
                    applied += 1;
                }
                None => debug!(id = %update.id, "Status update for unknown station"),
            }
        }
        debug!(received = updates.len(), applied, "Status updates applied");
        applied
    }

    /// Apply a push-channel message.
    ///
    /// Returns true when station availability changed, i.e. markers should be
    /// rebuilt and re-clustered.
    pub fn apply_message(&mut self, message: &FeedMessage, now: Instant) -> bool {
        match message {
            FeedMessage::StationStatusUpdate(updates) => self.apply_updates(updates, now) > 0,
            FeedMessage::PriceUpdate { .. } | FeedMessage::Heartbeat => false,
            FeedMessage::Other(kind) => {
                debug!(kind = %kind, "Ignoring unhandled feed message");
                false
            }
        }
    }

    /// Whether the station changed within [`RECENT_UPDATE_WINDOW`] of `now`.
    pub fn is_recently_updated(&self, id: &str, now: Instant) -> bool {
        self.last_update
            .get(id)
            .is_some_and(|&at| now.saturating_duration_since(at) < RECENT_UPDATE_WINDOW)
    }

    pub fn get(&self, id: &str) -> Option<&StationSnapshot> {
        self.index.get(id).map(|&i| &self.stations[i])
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations that are open and have a free charging point.
    pub fn available(&self) -> impl Iterator<Item = &StationSnapshot> {
        self.stations.iter().filter(|s| s.is_available())
    }

    /// The `limit` stations closest to `origin`, nearest first.
    pub fn nearby(&self, origin: GeoPoint, limit: usize) -> Vec<NearbyStation<'_>> {
        let mut ranked: Vec<NearbyStation<'_>> = self
            .stations
            .iter()
            .map(|station| NearbyStation {
                station,
                distance_km: haversine_km(origin, station.position()),
            })
            .collect();
        ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        ranked.truncate(limit);
        ranked
    }

    /// Stations whose name or address contains `keyword`, in feed order,
    /// at most `limit` of them. Matching is case-sensitive.
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<&StationSnapshot> {
        self.stations
            .iter()
            .filter(|s| s.name.contains(keyword) || s.address.contains(keyword))
            .take(limit)
            .collect()
    }

    /// Stations inside `bounds` (edges inclusive).
    pub fn within_bounds(&self, bounds: &GeoBounds) -> impl Iterator<Item = &StationSnapshot> {
        let bounds = *bounds;
        self.stations
            .iter()
            .filter(move |s| bounds.contains(s.position()))
    }

    /// Build map markers for every station.
    pub fn markers(&self) -> Vec<Marker> {
        self.stations.iter().map(StationSnapshot::to_marker).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::model::StationStatus;

    fn snapshot(id: &str, lat: f64, lng: f64, status: StationStatus, available: u32) -> StationSnapshot {
        StationSnapshot {
            id: id.to_string(),
            name: format!("Station {}", id),
            lat,
            lng,
            address: String::new(),
            status,
            total_count: Some(10),
            available_count: Some(available),
            charging_count: Some(10 - available),
        }
    }

    fn update(id: &str, available: u32) -> StatusUpdate {
        StatusUpdate {
            id: id.to_string(),
            status: None,
            available_count: Some(available),
            charging_count: None,
            total_count: None,
        }
    }

    fn hefei_registry() -> StationRegistry {
        StationRegistry::from_snapshots(vec![
            snapshot("a", 31.82, 117.22, StationStatus::Available, 4),
            snapshot("b", 31.90, 117.30, StationStatus::Busy, 0),
            snapshot("c", 31.70, 117.10, StationStatus::Available, 0),
            snapshot("d", 32.50, 118.00, StationStatus::Offline, 0),
        ])
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = hefei_registry();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("b").unwrap().status, StationStatus::Busy);
        assert!(registry.get("zzz").is_none());
    }

    #[test]
    fn test_apply_updates_skips_unknown_ids() {
        let mut registry = hefei_registry();
        let now = Instant::now();

        let applied = registry.apply_updates(&[update("a", 1), update("ghost", 5)], now);

        assert_eq!(applied, 1);
        assert_eq!(registry.get("a").unwrap().available_count, Some(1));
        assert!(registry.is_recently_updated("a", now));
        assert!(!registry.is_recently_updated("ghost", now));
    }

    #[test]
    fn test_recent_update_window_expires() {
        let mut registry = hefei_registry();
        let then = Instant::now();
        registry.apply_updates(&[update("a", 2)], then);

        assert!(registry.is_recently_updated("a", then + Duration::from_millis(2_999)));
        assert!(!registry.is_recently_updated("a", then + RECENT_UPDATE_WINDOW));
    }

    #[test]
    fn test_replace_keeps_stamps_of_surviving_stations() {
        let mut registry = hefei_registry();
        let now = Instant::now();
        registry.apply_updates(&[update("a", 2), update("b", 3)], now);

        registry.replace(vec![snapshot("a", 31.82, 117.22, StationStatus::Available, 9)]);

        assert!(registry.is_recently_updated("a", now));
        assert!(!registry.is_recently_updated("b", now));
        assert_eq!(registry.get("a").unwrap().available_count, Some(9));
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn test_apply_message() {
        let mut registry = hefei_registry();
        let now = Instant::now();

        assert!(registry.apply_message(
            &FeedMessage::StationStatusUpdate(vec![update("c", 3)]),
            now
        ));
        assert!(!registry.apply_message(
            &FeedMessage::StationStatusUpdate(vec![update("ghost", 3)]),
            now
        ));
        assert!(!registry.apply_message(&FeedMessage::Heartbeat, now));
        assert!(!registry.apply_message(&FeedMessage::PriceUpdate { timestamp: None }, now));
        assert!(!registry.apply_message(&FeedMessage::Other("x".into()), now));
    }

    #[test]
    fn test_available_filter() {
        let registry = hefei_registry();
        let ids: Vec<&str> = registry.available().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_nearby_sorted_and_limited() {
        let registry = hefei_registry();
        let origin = GeoPoint::new(31.83, 117.23);

        let nearest = registry.nearby(origin, 2);

        assert_eq!(nearest.len(), 2);
        assert_eq!(nearest[0].station.id, "a");
        assert!(nearest[0].distance_km <= nearest[1].distance_km);
        assert_eq!(registry.nearby(origin, DEFAULT_NEARBY_LIMIT).len(), 4);
    }

    #[test]
    fn test_within_bounds() {
        let registry = hefei_registry();
        let bounds = GeoBounds::new(31.7, 31.9, 117.1, 117.3);

        let mut ids: Vec<&str> = registry.within_bounds(&bounds).map(|s| s.id.as_str()).collect();
        ids.sort();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    fn addressed(id: &str, name: &str, address: &str) -> StationSnapshot {
        StationSnapshot {
            name: name.to_string(),
            address: address.to_string(),
            ..snapshot(id, 31.82, 117.22, StationStatus::Available, 1)
        }
    }

    fn search_registry() -> StationRegistry {
        StationRegistry::from_snapshots(vec![
            addressed("s1", "Wanda Plaza Charging", "Shushan District"),
            addressed("s2", "Binhu Library", "Baohe District, Wanda Road"),
            addressed("s3", "Airport P2", "Xinqiao"),
        ])
    }

    fn ids<'a>(stations: &[&'a StationSnapshot]) -> Vec<&'a str> {
        stations.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_search_matches_name() {
        let registry = search_registry();
        assert_eq!(ids(&registry.search("Library", DEFAULT_SEARCH_LIMIT)), vec!["s2"]);
    }

    #[test]
    fn test_search_matches_address() {
        let registry = search_registry();
        assert_eq!(ids(&registry.search("Xinqiao", DEFAULT_SEARCH_LIMIT)), vec!["s3"]);
        assert_eq!(
            ids(&registry.search("Wanda", DEFAULT_SEARCH_LIMIT)),
            vec!["s1", "s2"]
        );
    }

    #[test]
    fn test_search_without_match() {
        let registry = search_registry();
        assert!(registry.search("Nanjing", DEFAULT_SEARCH_LIMIT).is_empty());
        assert!(registry.search("wanda", DEFAULT_SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn test_search_respects_limit() {
        let stations: Vec<StationSnapshot> = (0..15)
            .map(|i| addressed(&format!("p{}", i), &format!("Plaza {}", i), "Hefei"))
            .collect();
        let registry = StationRegistry::from_snapshots(stations);

        let found = registry.search("Plaza", DEFAULT_SEARCH_LIMIT);

        assert_eq!(found.len(), 10);
        assert_eq!(found[0].id, "p0");
        assert_eq!(registry.search("Plaza", 3).len(), 3);
    }

    #[test]
    fn test_markers_follow_feed_order() {
        let registry = hefei_registry();
        let markers = registry.markers();
        assert_eq!(markers.len(), 4);
        assert_eq!(markers[2].station.id, "c");
        assert!(markers.iter().all(|m| !m.visible));
    }
}
