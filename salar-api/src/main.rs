use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use salar_api::{app, AppState};
use salar_core::SystemClock;
use salar_order::{BookingEngine, BookingService, InMemoryTripStore, TripStore};
use salar_store::{Config, RedisTripStore, StoreBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salar_api=debug,salar_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    let rules = &config.booking_rules;

    let engine = BookingEngine::new(
        rules.price_table()?,
        rules.capacity_policy()?,
        rules.eligibility_policy()?,
        Arc::new(SystemClock),
    );

    let store: Arc<dyn TripStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory trip store");
            Arc::new(InMemoryTripStore::new())
        }
        StoreBackend::Redis => {
            let redis = config
                .redis
                .as_ref()
                .context("store.backend is redis but [redis] is not configured")?;
            let store = RedisTripStore::new(&redis.url)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(store)
        }
    };

    let app = app(AppState::new(BookingService::new(engine, store)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Salar API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
