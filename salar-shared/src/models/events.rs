use uuid::Uuid;
use salar_catalog::{Price, VehicleClass};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct TripCreatedEvent {
    pub trip_id: Uuid,
    pub departure_date: chrono::NaiveDate,
    pub vehicle_class: VehicleClass,
    pub occupants: u32,
    pub capacity: u32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct TripJoinedEvent {
    pub trip_id: Uuid,
    pub joined: u32,
    pub occupants: u32,
    pub capacity: u32,
    pub price_per_person: Price,
    pub is_full: bool,
    pub timestamp: i64,
}

/// Occupancy changes broadcast to live listeners
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripEvent {
    Created(TripCreatedEvent),
    Joined(TripJoinedEvent),
}

impl TripEvent {
    pub fn trip_id(&self) -> Uuid {
        match self {
            TripEvent::Created(e) => e.trip_id,
            TripEvent::Joined(e) => e.trip_id,
        }
    }

    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            TripEvent::Created(_) => "trip_created",
            TripEvent::Joined(_) => "trip_joined",
        }
    }
}
