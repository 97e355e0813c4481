use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use salar_catalog::{Occupancy, Price, PriceTable, TourVariant, VehicleClass};
use salar_core::BookingContact;

/// Booking state of a trip. `Full` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripState {
    Open,
    Full,
}

/// One scheduled jeep departure.
///
/// Occupancy is private: only [`BookingEngine`](crate::BookingEngine) creates
/// trips and adds passengers, which keeps `occupants <= capacity` everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "TripRecord")]
pub struct Trip {
    id: Uuid,
    departure_date: NaiveDate,
    vehicle_class: VehicleClass,
    tour_variant: TourVariant,
    capacity: u32,
    occupants: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Trip {
    pub(crate) fn new(
        departure_date: NaiveDate,
        vehicle_class: VehicleClass,
        tour_variant: TourVariant,
        capacity: u32,
        occupants: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            departure_date,
            vehicle_class,
            tour_variant,
            capacity,
            occupants,
            created_at: now,
            updated_at: now,
        }
    }

    /// Caller has already checked the seats are free.
    pub(crate) fn add_occupants(&mut self, joining: u32) {
        debug_assert!(self.occupants + joining <= self.capacity);
        self.occupants += joining;
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        self.vehicle_class
    }

    pub fn tour_variant(&self) -> TourVariant {
        self.tour_variant
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn remaining_seats(&self) -> u32 {
        self.capacity - self.occupants
    }

    pub fn is_full(&self) -> bool {
        self.occupants == self.capacity
    }

    pub fn state(&self) -> TripState {
        if self.is_full() {
            TripState::Full
        } else {
            TripState::Open
        }
    }

    /// Share of seats taken, in `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        self.occupants as f64 / self.capacity as f64
    }

    /// Per-person price at the current occupancy
    pub fn current_price(&self, prices: &PriceTable) -> Price {
        prices.price_for(self.occupants as i64)
    }

    /// Per-person price once `joining` more passengers are on board
    pub fn projected_price(&self, prices: &PriceTable, joining: u32) -> Price {
        prices.price_for(self.occupants as i64 + joining as i64)
    }

    /// What the next single passenger would pay. `None` once full.
    pub fn next_seat_price(&self, prices: &PriceTable) -> Option<Price> {
        (!self.is_full()).then(|| self.projected_price(prices, 1))
    }
}

impl Occupancy for Trip {
    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn occupants(&self) -> u32 {
        self.occupants
    }
}

/// Wire shape of a stored trip, checked before it becomes a [`Trip`]
#[derive(Deserialize)]
struct TripRecord {
    id: Uuid,
    departure_date: NaiveDate,
    vehicle_class: VehicleClass,
    tour_variant: TourVariant,
    capacity: u32,
    occupants: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TripRecord> for Trip {
    type Error = String;

    fn try_from(r: TripRecord) -> Result<Self, Self::Error> {
        if r.capacity == 0 {
            return Err(format!("trip {} has zero capacity", r.id));
        }
        if r.occupants > r.capacity {
            return Err(format!(
                "trip {} has {} occupants for {} seats",
                r.id, r.occupants, r.capacity
            ));
        }
        Ok(Trip {
            id: r.id,
            departure_date: r.departure_date,
            vehicle_class: r.vehicle_class,
            tour_variant: r.tour_variant,
            capacity: r.capacity,
            occupants: r.occupants,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Parameters for opening a new group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrip {
    pub vehicle_class: VehicleClass,
    pub tour_variant: TourVariant,
    pub departure_date: NaiveDate,
    pub initial_passengers: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTripRequest {
    #[serde(flatten)]
    pub trip: NewTrip,
    pub contact: BookingContact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinTripRequest {
    pub passengers: u32,
    pub contact: BookingContact,
}
