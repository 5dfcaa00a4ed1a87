//! The long-lived location graph.
//!
//! Locations are kept ordered by id so every walk over the store, and every
//! projection built from it, sees nodes in the same order. Outgoing trips
//! keep their insertion order.

use std::collections::{BTreeMap, HashMap};

use tripgraph_core::{GraphSnapshot, Location, NodeId, Trip};

use crate::error::{Result, StoreError};

/// In-memory store of locations and trips.
#[derive(Debug, Default)]
pub struct GraphStore {
    locations: BTreeMap<NodeId, Location>,
    /// Name → id. The first location inserted under a name owns it.
    name_index: HashMap<String, NodeId>,
    /// Source id → outgoing trips, in insertion order.
    outgoing: HashMap<NodeId, Vec<Trip>>,
    trip_count: usize,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loader snapshot.
    ///
    /// Trips whose endpoints are not known locations are skipped.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut store = Self::new();

        for location in snapshot.locations {
            store.insert_location(location);
        }

        let mut skipped = 0usize;
        for trip in snapshot.trips {
            let (source, target) = (trip.source, trip.target);
            if let Err(e) = store.insert_trip(trip) {
                skipped += 1;
                tracing::warn!(%source, %target, error = %e, "Skipping trip with unknown endpoint");
            }
        }

        tracing::info!(
            locations = store.location_count(),
            trips = store.trip_count(),
            skipped,
            "Graph store loaded"
        );
        store
    }

    /// Insert a location, replacing any existing location with the same id.
    pub fn insert_location(&mut self, location: Location) {
        let id = location.id;

        let mut released = None;
        if let Some(previous) = self.locations.get(&id) {
            if previous.name != location.name && self.name_index.get(&previous.name) == Some(&id) {
                self.name_index.remove(&previous.name);
                released = Some(previous.name.clone());
            }
        }

        match self.name_index.get(&location.name) {
            Some(owner) if *owner != id => {
                tracing::warn!(
                    name = %location.name,
                    owner = %owner,
                    duplicate = %id,
                    "Duplicate location name; lookups keep the first location"
                );
            }
            Some(_) => {}
            None => {
                self.name_index.insert(location.name.clone(), id);
            }
        }

        self.locations.insert(id, location);

        // A renamed owner hands its old name to the lowest-id location still using it.
        if let Some(name) = released {
            if let Some(heir) = self.locations.values().find(|l| l.name == name) {
                self.name_index.insert(name, heir.id);
            }
        }
    }

    /// Insert a trip. Both endpoints must already be present.
    pub fn insert_trip(&mut self, trip: Trip) -> Result<()> {
        for id in [trip.source, trip.target] {
            if !self.locations.contains_key(&id) {
                return Err(StoreError::UnknownNode { id });
            }
        }

        self.outgoing.entry(trip.source).or_default().push(trip);
        self.trip_count += 1;
        Ok(())
    }

    /// Resolve a location name to its id.
    pub fn lookup(&self, name: &str) -> Result<NodeId> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::NodeNotFound {
                name: name.to_string(),
            })
    }

    /// Outgoing `(target, weight)` pairs for trips that carry `weight_property`.
    pub fn neighbors(&self, id: NodeId, weight_property: &str) -> Result<Vec<(NodeId, f64)>> {
        if !self.locations.contains_key(&id) {
            return Err(StoreError::UnknownNode { id });
        }

        Ok(self
            .trips_from(id)
            .iter()
            .filter_map(|trip| trip.weight(weight_property).map(|w| (trip.target, w)))
            .collect())
    }

    /// All outgoing trips of a location, in insertion order.
    pub fn trips_from(&self, id: NodeId) -> &[Trip] {
        self.outgoing.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn location(&self, id: NodeId) -> Option<&Location> {
        self.locations.get(&id)
    }

    /// Locations in ascending id order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trip_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> GraphStore {
        let snapshot = GraphSnapshot {
            locations: vec![
                Location::new(3, "C"),
                Location::new(1, "A"),
                Location::new(2, "B"),
            ],
            trips: vec![
                Trip::new(1, 2).with_weight("distance", 5.0),
                Trip::new(1, 3).with_weight("duration", 9.0),
                Trip::new(2, 3)
                    .with_weight("distance", 1.5)
                    .with_weight("duration", 2.0),
            ],
        };
        GraphStore::from_snapshot(snapshot)
    }

    #[test]
    fn test_lookup_by_name() {
        let store = sample_store();
        assert_eq!(store.lookup("A").unwrap(), NodeId(1));
        assert_eq!(store.lookup("C").unwrap(), NodeId(3));

        let err = store.lookup("Z").unwrap_err();
        assert!(matches!(err, StoreError::NodeNotFound { ref name } if name == "Z"));
    }

    #[test]
    fn test_neighbors_filter_by_weight_property() {
        let store = sample_store();

        let by_distance = store.neighbors(NodeId(1), "distance").unwrap();
        assert_eq!(by_distance, vec![(NodeId(2), 5.0)]);

        let by_duration = store.neighbors(NodeId(1), "duration").unwrap();
        assert_eq!(by_duration, vec![(NodeId(3), 9.0)]);

        assert!(store.neighbors(NodeId(3), "distance").unwrap().is_empty());
        assert!(matches!(
            store.neighbors(NodeId(99), "distance"),
            Err(StoreError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_locations_iterate_in_id_order() {
        let store = sample_store();
        let ids: Vec<u64> = store.locations().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.location_count(), 3);
        assert_eq!(store.trip_count(), 3);
    }

    #[test]
    fn test_trip_with_missing_endpoint_skipped() {
        let snapshot = GraphSnapshot {
            locations: vec![Location::new(1, "A")],
            trips: vec![Trip::new(1, 42).with_weight("distance", 1.0)],
        };

        let store = GraphStore::from_snapshot(snapshot);
        assert_eq!(store.trip_count(), 0);
        assert!(store.trips_from(NodeId(1)).is_empty());
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut store = GraphStore::new();
        store.insert_location(Location::new(7, "Harbor"));
        store.insert_location(Location::new(3, "Harbor"));

        assert_eq!(store.lookup("Harbor").unwrap(), NodeId(7));
        assert_eq!(store.location_count(), 2);
    }

    #[test]
    fn test_reinsert_renames_location() {
        let mut store = GraphStore::new();
        store.insert_location(Location::new(1, "Old"));
        store.insert_location(Location::new(1, "New"));

        assert!(store.lookup("Old").is_err());
        assert_eq!(store.lookup("New").unwrap(), NodeId(1));
        assert_eq!(store.location_count(), 1);
    }

    #[test]
    fn test_renamed_owner_hands_name_to_next_location() {
        let mut store = GraphStore::new();
        store.insert_location(Location::new(3, "X"));
        store.insert_location(Location::new(1, "Y"));
        store.insert_location(Location::new(2, "X"));
        store.insert_location(Location::new(1, "X"));

        // Id 3 was inserted first and keeps the name.
        assert_eq!(store.lookup("X").unwrap(), NodeId(3));

        store.insert_location(Location::new(3, "Z"));
        assert_eq!(store.lookup("X").unwrap(), NodeId(1));
        assert_eq!(store.lookup("Z").unwrap(), NodeId(3));

        store.insert_location(Location::new(1, "W"));
        store.insert_location(Location::new(2, "V"));
        assert!(store.lookup("X").is_err());
    }
}
