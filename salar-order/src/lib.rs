pub mod models;
pub mod quote;
pub mod engine;
pub mod repository;
pub mod service;

pub use models::{CreateTripRequest, JoinTripRequest, NewTrip, Trip, TripState};
pub use quote::JoinQuote;
pub use engine::{BookingEngine, BookingError, CreatedTrip, JoinedTrip};
pub use repository::{InMemoryTripStore, StoreResult, TripFilter, TripStore};
pub use service::BookingService;
