use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use salar_catalog::{CapacityPolicy, Occupancy, Price, PriceTable};
use salar_core::{Clock, CoreError, EligibilityPolicy, EligibilityTier, SystemClock};

use crate::models::{NewTrip, Trip};
use crate::quote::JoinQuote;

/// Result of opening a group: the new trip and what its creator pays
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTrip {
    pub trip: Trip,
    pub price_per_person: Price,
    pub total_cost: i64,
}

/// Result of joining a group: the updated trip and the committed quote
#[derive(Debug, Clone, Serialize)]
pub struct JoinedTrip {
    pub trip: Trip,
    pub quote: JoinQuote,
}

/// Validates and applies trip creation and joins.
///
/// Pure with respect to storage: it takes trips by reference and hands back
/// new values, so a rejected request never touches the caller's trip.
pub struct BookingEngine {
    prices: PriceTable,
    capacity: CapacityPolicy,
    eligibility: EligibilityPolicy,
    clock: Arc<dyn Clock>,
}

impl BookingEngine {
    pub fn new(
        prices: PriceTable,
        capacity: CapacityPolicy,
        eligibility: EligibilityPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            prices,
            capacity,
            eligibility,
            clock,
        }
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn capacity(&self) -> &CapacityPolicy {
        &self.capacity
    }

    pub fn eligibility(&self) -> &EligibilityPolicy {
        &self.eligibility
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Open a new group with the creator's passengers on board.
    pub fn create_trip(&self, request: &NewTrip) -> Result<CreatedTrip, BookingError> {
        let verdict = self.eligibility.evaluate(
            request.departure_date,
            request.initial_passengers,
            self.clock.today(),
        );
        if !verdict.eligible {
            return Err(BookingError::IneligibleDate {
                tier: verdict.tier,
                reason: verdict.reason.unwrap_or_default(),
                days_until: verdict.days_until,
            });
        }

        let capacity = self.capacity.max_capacity(request.vehicle_class);
        let requested = request.initial_passengers;
        if requested < 1 || requested > capacity {
            return Err(BookingError::InvalidPassengerCount {
                requested,
                capacity,
            });
        }

        let trip = Trip::new(
            request.departure_date,
            request.vehicle_class,
            request.tour_variant,
            capacity,
            requested,
        );
        let price_per_person = trip.current_price(&self.prices);

        Ok(CreatedTrip {
            trip,
            price_per_person,
            total_cost: price_per_person as i64 * requested as i64,
        })
    }

    /// Add `joining` passengers to `trip`, returning the updated copy.
    pub fn join(&self, trip: &Trip, joining: u32) -> Result<JoinedTrip, BookingError> {
        if trip.is_full() {
            return Err(BookingError::TripFull(trip.id()));
        }

        if !self.capacity.can_accept(trip, joining) {
            return Err(BookingError::CapacityExceeded {
                requested: joining,
                remaining: self.capacity.remaining(trip),
            });
        }

        let quote = JoinQuote::for_trip(&self.prices, trip, joining);
        let mut updated = trip.clone();
        updated.add_occupants(joining);

        debug_assert!(updated.occupants() <= updated.capacity());
        Ok(JoinedTrip {
            trip: updated,
            quote,
        })
    }

    pub fn quote_join(&self, trip: &Trip, joining: u32) -> JoinQuote {
        JoinQuote::for_trip(&self.prices, trip, joining)
    }
}

impl Default for BookingEngine {
    fn default() -> Self {
        Self::new(
            PriceTable::default(),
            CapacityPolicy::default(),
            EligibilityPolicy::default(),
            Arc::new(SystemClock),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Departure not bookable ({tier:?}): {reason}")]
    IneligibleDate {
        tier: EligibilityTier,
        reason: String,
        days_until: i64,
    },

    #[error("Invalid passenger count {requested}: must be between 1 and {capacity}")]
    InvalidPassengerCount {
        requested: u32,
        capacity: u32,
    },

    #[error("Trip is full: {0}")]
    TripFull(Uuid),

    #[error("Not enough seats: requested {requested}, remaining {remaining}")]
    CapacityExceeded {
        requested: u32,
        remaining: u32,
    },

    #[error("Trip not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("Trip store failure: {0}")]
    Store(String),
}
