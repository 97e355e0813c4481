use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{error, info, warn};
use uuid::Uuid;
use salar_catalog::Occupancy;
use salar_shared::models::{TripCreatedEvent, TripEvent, TripJoinedEvent};

use crate::engine::{BookingEngine, BookingError, CreatedTrip, JoinedTrip};
use crate::models::{CreateTripRequest, JoinTripRequest, Trip};
use crate::quote::JoinQuote;
use crate::repository::{TripFilter, TripStore};

const EVENT_BUFFER: usize = 100;

type LockMap = StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>;

/// A caller's handle on one trip's lock. Dropping the last handle removes
/// the trip from the lock map, including when the request is cancelled.
struct TripLock<'a> {
    locks: &'a LockMap,
    trip_id: Uuid,
    lock: Arc<Mutex<()>>,
}

impl<'a> TripLock<'a> {
    fn for_trip(locks: &'a LockMap, trip_id: Uuid) -> Self {
        let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = map.entry(trip_id).or_default().clone();
        Self { locks, trip_id, lock }
    }

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for TripLock<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // handles are only cloned under the map lock: two means the map and us
        if map
            .get(&self.trip_id)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2)
        {
            map.remove(&self.trip_id);
        }
    }
}

/// Runs booking operations against a [`TripStore`].
///
/// Every read-validate-write on a trip happens while holding that trip's
/// lock, so concurrent joins on the same trip are applied one at a time and
/// can never oversell it.
pub struct BookingService {
    engine: BookingEngine,
    store: Arc<dyn TripStore>,
    locks: LockMap,
    events: broadcast::Sender<TripEvent>,
}

impl BookingService {
    pub fn new(engine: BookingEngine, store: Arc<dyn TripStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            engine,
            store,
            locks: StdMutex::new(HashMap::new()),
            events,
        }
    }

    pub fn engine(&self) -> &BookingEngine {
        &self.engine
    }

    /// Live feed of created and joined trips
    pub fn subscribe(&self) -> broadcast::Receiver<TripEvent> {
        self.events.subscribe()
    }

    pub async fn create_trip(&self, request: CreateTripRequest) -> Result<CreatedTrip, BookingError> {
        request.contact.validate()?;

        let created = self.engine.create_trip(&request.trip).map_err(|e| {
            warn!(
                departure_date = %request.trip.departure_date,
                passengers = request.trip.initial_passengers,
                "trip creation rejected: {}", e
            );
            e
        })?;

        // fresh id, nobody else can hold its lock yet
        self.save(&created.trip).await?;

        info!(
            trip_id = %created.trip.id(),
            vehicle_class = %created.trip.vehicle_class(),
            occupants = created.trip.occupants(),
            diet = ?request.contact.diet,
            "trip created"
        );

        self.publish(TripEvent::Created(TripCreatedEvent {
            trip_id: created.trip.id(),
            departure_date: created.trip.departure_date(),
            vehicle_class: created.trip.vehicle_class(),
            occupants: created.trip.occupants(),
            capacity: created.trip.capacity(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(created)
    }

    pub async fn join_trip(&self, trip_id: Uuid, request: JoinTripRequest) -> Result<JoinedTrip, BookingError> {
        request.contact.validate()?;

        let handle = TripLock::for_trip(&self.locks, trip_id);
        let _guard = handle.lock().await;
        self.join_locked(trip_id, &request).await
    }

    /// Load, validate and save. Caller holds the trip's lock.
    async fn join_locked(&self, trip_id: Uuid, request: &JoinTripRequest) -> Result<JoinedTrip, BookingError> {
        let trip = self.load(trip_id).await?;
        let joined = self.engine.join(&trip, request.passengers).map_err(|e| {
            warn!(%trip_id, passengers = request.passengers, "join rejected: {}", e);
            e
        })?;
        self.save(&joined.trip).await?;

        info!(
            %trip_id,
            joined = request.passengers,
            occupants = joined.trip.occupants(),
            price_per_person = joined.quote.projected_price,
            diet = ?request.contact.diet,
            "passengers joined trip"
        );

        self.publish(TripEvent::Joined(TripJoinedEvent {
            trip_id,
            joined: request.passengers,
            occupants: joined.trip.occupants(),
            capacity: joined.trip.capacity(),
            price_per_person: joined.quote.projected_price,
            is_full: joined.trip.is_full(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(joined)
    }

    pub async fn quote_join(&self, trip_id: Uuid, joining: u32) -> Result<JoinQuote, BookingError> {
        let trip = self.load(trip_id).await?;
        Ok(self.engine.quote_join(&trip, joining))
    }

    pub async fn get_trip(&self, trip_id: Uuid) -> Result<Trip, BookingError> {
        self.load(trip_id).await
    }

    pub async fn list_trips(&self, filter: &TripFilter) -> Result<Vec<Trip>, BookingError> {
        self.store.list(filter).await.map_err(|e| {
            error!("Failed to list trips: {}", e);
            BookingError::Store(e.to_string())
        })
    }

    async fn load(&self, trip_id: Uuid) -> Result<Trip, BookingError> {
        self.store
            .get(trip_id)
            .await
            .map_err(|e| {
                error!(%trip_id, "Failed to load trip: {}", e);
                BookingError::Store(e.to_string())
            })?
            .ok_or(BookingError::NotFound(trip_id))
    }

    async fn save(&self, trip: &Trip) -> Result<(), BookingError> {
        self.store.save(trip).await.map_err(|e| {
            error!(trip_id = %trip.id(), "Failed to save trip: {}", e);
            BookingError::Store(e.to_string())
        })
    }

    fn publish(&self, event: TripEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}
