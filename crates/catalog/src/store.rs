use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AlertId, CatalogError, PriceAlert, Trip, demo_alerts};

/// Everything one user has saved.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSnapshot {
    pub trips: BTreeMap<String, Trip>,
    pub alerts: BTreeMap<AlertId, PriceAlert>,
}

impl TravelSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(raw).map_err(|e| CatalogError::Corrupt(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string(self).map_err(|e| CatalogError::Corrupt(e.to_string()))
    }
}

pub trait TravelStore {
    fn trips(&self) -> Result<Vec<Trip>, CatalogError>;
    fn trip(&self, id: &str) -> Result<Option<Trip>, CatalogError>;
    fn upsert_trip(&mut self, trip: Trip) -> Result<(), CatalogError>;
    fn delete_trip(&mut self, id: &str) -> Result<bool, CatalogError>;

    fn alerts(&self) -> Result<Vec<PriceAlert>, CatalogError>;
    fn alert(&self, id: AlertId) -> Result<Option<PriceAlert>, CatalogError>;
    fn upsert_alert(&mut self, alert: PriceAlert) -> Result<(), CatalogError>;
    fn delete_alert(&mut self, id: AlertId) -> Result<bool, CatalogError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTravelStore {
    snapshot: TravelSnapshot,
}

impl InMemoryTravelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demo_alerts() -> Self {
        let mut store = Self::new();
        for alert in demo_alerts() {
            store.snapshot.alerts.insert(alert.id, alert);
        }
        store
    }

    pub fn from_snapshot(snapshot: TravelSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &TravelSnapshot {
        &self.snapshot
    }

    /// One past the highest alert id in use.
    pub fn next_alert_id(&self) -> AlertId {
        self.snapshot
            .alerts
            .keys()
            .next_back()
            .map_or(1, |id| id + 1)
    }

    pub fn alerts_mut(&mut self) -> impl Iterator<Item = &mut PriceAlert> {
        self.snapshot.alerts.values_mut()
    }
}

impl TravelStore for InMemoryTravelStore {
    fn trips(&self) -> Result<Vec<Trip>, CatalogError> {
        Ok(self.snapshot.trips.values().cloned().collect())
    }

    fn trip(&self, id: &str) -> Result<Option<Trip>, CatalogError> {
        Ok(self.snapshot.trips.get(id).cloned())
    }

    fn upsert_trip(&mut self, trip: Trip) -> Result<(), CatalogError> {
        if trip.id.is_empty() {
            return Err(CatalogError::MissingField("id"));
        }
        self.snapshot.trips.insert(trip.id.clone(), trip);
        Ok(())
    }

    fn delete_trip(&mut self, id: &str) -> Result<bool, CatalogError> {
        Ok(self.snapshot.trips.remove(id).is_some())
    }

    fn alerts(&self) -> Result<Vec<PriceAlert>, CatalogError> {
        Ok(self.snapshot.alerts.values().cloned().collect())
    }

    fn alert(&self, id: AlertId) -> Result<Option<PriceAlert>, CatalogError> {
        Ok(self.snapshot.alerts.get(&id).cloned())
    }

    fn upsert_alert(&mut self, alert: PriceAlert) -> Result<(), CatalogError> {
        self.snapshot.alerts.insert(alert.id, alert);
        Ok(())
    }

    fn delete_alert(&mut self, id: AlertId) -> Result<bool, CatalogError> {
        Ok(self.snapshot.alerts.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryTravelStore, TravelSnapshot, TravelStore};
    use crate::{CatalogError, Trip};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    fn trip(id: &str) -> Trip {
        Trip::from_booking(
            id,
            "DXB",
            Some("FRA"),
            "Emirates",
            "389€",
            GeoPoint::new(25.25, 55.36),
            "MAY 2026",
            1,
        )
    }

    #[test]
    fn trips_upsert_get_delete() {
        let mut store = InMemoryTravelStore::new();
        store.upsert_trip(trip("t_2")).unwrap();
        store.upsert_trip(trip("t_1")).unwrap();

        let ids: Vec<String> = store.trips().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["t_1".to_string(), "t_2".to_string()]);
        assert_eq!(store.trip("t_1").unwrap().map(|t| t.title), Some("DXB".to_string()));

        assert!(store.delete_trip("t_1").unwrap());
        assert!(!store.delete_trip("t_1").unwrap());
        assert_eq!(store.trips().unwrap().len(), 1);
    }

    #[test]
    fn trip_without_id_is_rejected() {
        let mut store = InMemoryTravelStore::new();
        assert_eq!(
            store.upsert_trip(trip("")),
            Err(CatalogError::MissingField("id"))
        );
    }

    #[test]
    fn demo_store_allocates_ids_after_seeded_alerts() {
        let mut store = InMemoryTravelStore::with_demo_alerts();
        assert_eq!(store.alerts().unwrap().len(), 3);
        assert_eq!(store.next_alert_id(), 4);

        assert!(store.delete_alert(3).unwrap());
        assert_eq!(store.next_alert_id(), 3);
        assert_eq!(InMemoryTravelStore::new().next_alert_id(), 1);
    }

    #[test]
    fn snapshot_json_round_trip() {
        let mut store = InMemoryTravelStore::with_demo_alerts();
        store.upsert_trip(trip("t_1")).unwrap();

        let json = store.snapshot().to_json().unwrap();
        let restored = InMemoryTravelStore::from_snapshot(TravelSnapshot::from_json(&json).unwrap());
        assert_eq!(restored.snapshot(), store.snapshot());
        assert!(matches!(
            TravelSnapshot::from_json("{"),
            Err(CatalogError::Corrupt(_))
        ));
    }
}
