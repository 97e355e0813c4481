pub mod events;

pub use events::{TripCreatedEvent, TripEvent, TripJoinedEvent};
