use chrono::{Local, NaiveDate};

/// Source of "today" for departure-date arithmetic
pub trait Clock: Send + Sync {
    /// Current calendar date, i.e. local midnight
    fn today(&self) -> NaiveDate;
}

/// Reads the host's local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned date, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
