use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-person price in whole USD
pub type Price = i32;

/// One rung of the price ladder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceTier {
    pub occupants: u32,
    pub price_per_person: Price,
}

/// Occupancy-based price ladder.
///
/// Holds a price for every occupant count in `[1, max_occupants]`. Prices never
/// increase as the vehicle fills up, so every extra passenger lowers (or keeps)
/// the rate for the whole group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    /// `prices[n - 1]` is the price for `n` occupants
    prices: Vec<Price>,
}

impl PriceTable {
    /// Build a table from an `occupants -> price` map.
    pub fn new(entries: &BTreeMap<u32, Price>) -> Result<Self, PricingError> {
        let max = *entries.keys().next_back().unwrap_or(&0);
        if max == 0 {
            return Err(PricingError::Empty);
        }

        // a gap-free table has exactly `max` keys in `1..=max`
        if entries.range(1..=max).count() as u64 != u64::from(max) {
            let missing = (1..=max).find(|n| !entries.contains_key(n)).unwrap_or(max);
            return Err(PricingError::MissingTier(missing));
        }
        let mut prices = Vec::with_capacity(entries.len());

        for occupants in 1..=max {
            let price = *entries
                .get(&occupants)
                .ok_or(PricingError::MissingTier(occupants))?;

            if price <= 0 {
                return Err(PricingError::NonPositivePrice { occupants, price });
            }

            if let Some(&previous) = prices.last() {
                if price > previous {
                    return Err(PricingError::Increasing {
                        occupants,
                        price,
                        previous,
                    });
                }
            }

            prices.push(price);
        }

        Ok(Self { prices })
    }

    /// Price per person for a vehicle carrying `occupants` passengers.
    ///
    /// Total over every integer: counts below 1 use the single-occupant price,
    /// counts above the table size use the largest-group price.
    pub fn price_for(&self, occupants: i64) -> Price {
        let max = self.prices.len() as i64;
        let index = occupants.clamp(1, max) - 1;
        self.prices[index as usize]
    }

    pub fn max_occupants(&self) -> u32 {
        self.prices.len() as u32
    }

    pub fn tiers(&self) -> Vec<PriceTier> {
        self.prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PriceTier {
                occupants: i as u32 + 1,
                price_per_person: price,
            })
            .collect()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            prices: vec![800, 420, 290, 215, 195, 180],
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Price table is empty")]
    Empty,

    #[error("Price table has no entry for {0} occupants")]
    MissingTier(u32),

    #[error("Price for {occupants} occupants must be positive, got {price}")]
    NonPositivePrice { occupants: u32, price: Price },

    #[error("Price for {occupants} occupants ({price}) exceeds the price for one fewer ({previous})")]
    Increasing {
        occupants: u32,
        price: Price,
        previous: Price,
    },
}
