use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::info;
use uuid::Uuid;
use salar_order::repository::sort_trips;
use salar_order::{StoreResult, Trip, TripFilter, TripStore};

const TRIP_INDEX_KEY: &str = "trips:index";

fn trip_key(id: impl std::fmt::Display) -> String {
    format!("trip:{}", id)
}

/// Trips stored as JSON documents, one key per trip plus an id index set.
///
/// Mutations are serialized per trip by the booking service in this
/// process; running several API instances against one Redis needs a shared
/// lock on top.
#[derive(Clone)]
pub struct RedisTripStore {
    client: redis::Client,
}

impl RedisTripStore {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        // fail fast on a bad address
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        info!("Connected to Redis trip store");
        Ok(Self { client })
    }
}

#[async_trait]
impl TripStore for RedisTripStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Trip>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(trip_key(id)).await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, trip: &Trip) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(trip)?;

        redis::pipe()
            .atomic()
            .set(trip_key(trip.id()), payload)
            .ignore()
            .sadd(TRIP_INDEX_KEY, trip.id().to_string())
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn list(&self, filter: &TripFilter) -> StoreResult<Vec<Trip>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let ids: Vec<String> = conn.smembers(TRIP_INDEX_KEY).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(trip_key).collect();
        let docs: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

        let mut trips = Vec::with_capacity(docs.len());
        for json in docs.into_iter().flatten() {
            let trip: Trip = serde_json::from_str(&json)?;
            if filter.matches(&trip) {
                trips.push(trip);
            }
        }
        sort_trips(&mut trips);
        Ok(trips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_key_format() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(trip_key(id), "trip:67e55044-10b1-426f-9247-bb680e5fe0c8");
        // index members are stored as strings and must map to the same key
        assert_eq!(trip_key(id.to_string()), trip_key(id));
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_to_connect() {
        let result = RedisTripStore::new("redis://127.0.0.1:1/").await;
        assert!(result.is_err());
    }
}
