pub mod clock;
pub mod eligibility;
pub mod booking;

pub use clock::{Clock, FixedClock, SystemClock};
pub use eligibility::{
    parse_departure_date, EligibilityPolicy, EligibilityResult, EligibilityRules, EligibilityTier,
};
pub use booking::BookingContact;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
