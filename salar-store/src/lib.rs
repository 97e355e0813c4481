pub mod app_config;
pub mod redis_repo;

pub use app_config::{BookingRules, Config, RulesError, StoreBackend};
pub use redis_repo::RedisTripStore;
