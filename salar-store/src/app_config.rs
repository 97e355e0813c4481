use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::env;
use salar_catalog::{CapacityError, CapacityPolicy, CatalogError, PriceTable, PricingError, VehicleClass};
use salar_core::{CoreError, EligibilityPolicy, EligibilityRules};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub redis: Option<RedisConfig>,
    #[serde(default)]
    pub booking_rules: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Pricing, capacity and lead-time rules. Every key falls back to the
/// standard tariff when absent.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BookingRules {
    /// occupants -> per-person price. Keys are strings in config files.
    #[serde(default = "default_price_table")]
    pub price_table: BTreeMap<String, i32>,
    /// vehicle class -> seats
    #[serde(default = "default_capacity")]
    pub capacity: HashMap<String, u32>,
    #[serde(default = "default_critical_days")]
    pub critical_days: i64,
    #[serde(default = "default_urgent_days")]
    pub urgent_days: i64,
    #[serde(default = "default_urgent_min_pax")]
    pub urgent_min_pax: u32,
}

fn default_price_table() -> BTreeMap<String, i32> {
    PriceTable::default()
        .tiers()
        .into_iter()
        .map(|tier| (tier.occupants.to_string(), tier.price_per_person))
        .collect()
}

fn default_capacity() -> HashMap<String, u32> {
    VehicleClass::ALL
        .iter()
        .map(|class| (class.to_string(), class.default_capacity()))
        .collect()
}

fn default_critical_days() -> i64 { 3 }
fn default_urgent_days() -> i64 { 5 }
fn default_urgent_min_pax() -> u32 { 4 }

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            price_table: default_price_table(),
            capacity: default_capacity(),
            critical_days: default_critical_days(),
            urgent_days: default_urgent_days(),
            urgent_min_pax: default_urgent_min_pax(),
        }
    }
}

impl BookingRules {
    pub fn price_table(&self) -> Result<PriceTable, RulesError> {
        let mut entries = BTreeMap::new();
        for (key, price) in &self.price_table {
            let occupants: u32 = key
                .trim()
                .parse()
                .map_err(|_| RulesError::InvalidOccupancyKey(key.clone()))?;
            entries.insert(occupants, *price);
        }
        Ok(PriceTable::new(&entries)?)
    }

    pub fn capacity_policy(&self) -> Result<CapacityPolicy, RulesError> {
        let mut seats = HashMap::new();
        for (key, count) in &self.capacity {
            let class: VehicleClass = key.parse()?;
            seats.insert(class, *count);
        }
        Ok(CapacityPolicy::new(seats)?)
    }

    pub fn eligibility_policy(&self) -> Result<EligibilityPolicy, RulesError> {
        Ok(EligibilityPolicy::new(EligibilityRules {
            critical_days: self.critical_days,
            urgent_days: self.urgent_days,
            urgent_min_pax: self.urgent_min_pax,
        })?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Price table key is not an occupant count: {0}")]
    InvalidOccupancyKey(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Eligibility(#[from] CoreError),
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SALAR__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SALAR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
