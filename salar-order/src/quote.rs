use serde::{Deserialize, Serialize};
use salar_catalog::{Price, PriceTable};
use crate::models::Trip;

/// What a group of `joining` passengers would pay to join a trip.
///
/// Joiners always pay the post-join tier, so a larger group lowers its own
/// rate and `per_person_savings` is never negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinQuote {
    pub joining: u32,
    pub current_price: Price,
    pub projected_price: Price,
    pub per_person_savings: Price,
    pub total_cost: i64,
    pub remaining_seats: u32,
}

impl JoinQuote {
    pub fn for_trip(prices: &PriceTable, trip: &Trip, joining: u32) -> Self {
        let current_price = trip.current_price(prices);
        let projected_price = trip.projected_price(prices, joining);

        Self {
            joining,
            current_price,
            projected_price,
            per_person_savings: current_price - projected_price,
            total_cost: projected_price as i64 * joining as i64,
            remaining_seats: trip.remaining_seats(),
        }
    }

    /// Whether the quoted group still fits in the trip
    pub fn fits(&self) -> bool {
        self.joining >= 1 && self.joining <= self.remaining_seats
    }
}
