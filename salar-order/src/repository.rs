use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Trip;

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Search criteria for listing trips.
///
/// A departure date wins over a seat count, matching the search box: when a
/// date is given only that date is checked.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TripFilter {
    pub departure_date: Option<NaiveDate>,
    /// Minimum free seats, i.e. the size of the group looking to join
    #[serde(alias = "passengers")]
    pub min_free_seats: Option<u32>,
}

impl TripFilter {
    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            departure_date: Some(date),
            min_free_seats: None,
        }
    }

    pub fn with_free_seats(seats: u32) -> Self {
        Self {
            departure_date: None,
            min_free_seats: Some(seats),
        }
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        if let Some(date) = self.departure_date {
            return trip.departure_date() == date;
        }
        if let Some(seats) = self.min_free_seats {
            return trip.remaining_seats() >= seats;
        }
        true
    }
}

/// Durable home of trips. Mutations go through
/// [`BookingService`](crate::BookingService), which serializes them per trip.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Trip>>;

    async fn save(&self, trip: &Trip) -> StoreResult<()>;

    /// Matching trips, soonest departure first
    async fn list(&self, filter: &TripFilter) -> StoreResult<Vec<Trip>>;
}

/// Sort order shared by every store
pub fn sort_trips(trips: &mut [Trip]) {
    trips.sort_by(|a, b| {
        a.departure_date()
            .cmp(&b.departure_date())
            .then(a.created_at().cmp(&b.created_at()))
    });
}

/// Process-local trip store
#[derive(Default)]
pub struct InMemoryTripStore {
    trips: RwLock<HashMap<Uuid, Trip>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Trip>> {
        Ok(self.trips.read().await.get(&id).cloned())
    }

    async fn save(&self, trip: &Trip) -> StoreResult<()> {
        self.trips.write().await.insert(trip.id(), trip.clone());
        Ok(())
    }

    async fn list(&self, filter: &TripFilter) -> StoreResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        sort_trips(&mut trips);
        Ok(trips)
    }
}
