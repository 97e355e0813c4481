use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use salar_catalog::{DietPreference, Price, PriceTier, TourVariant, VehicleClass};
use salar_core::{parse_departure_date, EligibilityResult};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EligibilityQuery {
    #[serde(default)]
    pub departure_date: String,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
}

fn default_passengers() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct PriceTableResponse {
    pub tiers: Vec<PriceTier>,
}

#[derive(Debug, Serialize)]
pub struct OccupancyPriceResponse {
    pub occupants: i64,
    pub price_per_person: Price,
}

#[derive(Debug, Serialize)]
pub struct VehicleClassEntry {
    pub vehicle_class: VehicleClass,
    pub capacity: u32,
}

#[derive(Debug, Serialize)]
pub struct TourEntry {
    pub tour_variant: TourVariant,
    pub name: &'static str,
    pub days: u32,
}

#[derive(Debug, Serialize)]
pub struct DietEntry {
    pub diet: DietPreference,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub vehicle_classes: Vec<VehicleClassEntry>,
    pub tours: Vec<TourEntry>,
    pub diets: Vec<DietEntry>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/eligibility", get(evaluate_eligibility))
        .route("/v1/prices", get(price_table))
        .route("/v1/prices/{occupants}", get(price_for_occupancy))
        .route("/v1/catalog", get(catalog))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/eligibility?departure_date=YYYY-MM-DD&passengers=N
async fn evaluate_eligibility(
    State(state): State<AppState>,
    Query(query): Query<EligibilityQuery>,
) -> Result<Json<EligibilityResult>, AppError> {
    let departure_date = parse_departure_date(&query.departure_date)?;
    let engine = state.bookings.engine();

    let result = engine
        .eligibility()
        .evaluate_now(engine.clock(), departure_date, query.passengers);

    Ok(Json(result))
}

/// GET /v1/prices
async fn price_table(State(state): State<AppState>) -> Json<PriceTableResponse> {
    Json(PriceTableResponse {
        tiers: state.bookings.engine().prices().tiers(),
    })
}

/// GET /v1/prices/{occupants}
async fn price_for_occupancy(
    State(state): State<AppState>,
    Path(occupants): Path<i64>,
) -> Json<OccupancyPriceResponse> {
    Json(OccupancyPriceResponse {
        occupants,
        price_per_person: state.bookings.engine().prices().price_for(occupants),
    })
}

/// GET /v1/catalog
async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let capacity = state.bookings.engine().capacity();

    Json(CatalogResponse {
        vehicle_classes: VehicleClass::ALL
            .iter()
            .map(|class| VehicleClassEntry {
                vehicle_class: *class,
                capacity: capacity.max_capacity(*class),
            })
            .collect(),
        tours: TourVariant::ALL
            .iter()
            .map(|tour| {
                let info = tour.info();
                TourEntry {
                    tour_variant: *tour,
                    name: info.name,
                    days: info.days,
                }
            })
            .collect(),
        diets: DietPreference::ALL
            .iter()
            .map(|diet| DietEntry {
                diet: *diet,
                label: diet.label(),
            })
            .collect(),
    })
}
