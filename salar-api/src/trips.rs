use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;
use salar_catalog::{Occupancy, Price, PriceTable, TourVariant, VehicleClass};
use salar_core::eligibility::days_until;
use salar_order::{CreateTripRequest, JoinQuote, JoinTripRequest, Trip, TripFilter, TripState};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Trip as shown to a traveller, with its derived figures
#[derive(Debug, Serialize)]
pub struct TripView {
    pub id: Uuid,
    pub departure_date: NaiveDate,
    pub days_until: i64,
    pub vehicle_class: VehicleClass,
    pub tour_variant: TourVariant,
    pub tour_name: &'static str,
    pub tour_days: u32,
    pub capacity: u32,
    pub occupants: u32,
    pub remaining_seats: u32,
    pub state: TripState,
    pub fill_ratio: f64,
    pub current_price: Price,
    pub next_seat_price: Option<Price>,
}

impl TripView {
    fn new(trip: &Trip, prices: &PriceTable, today: NaiveDate) -> Self {
        let tour = trip.tour_variant().info();
        Self {
            id: trip.id(),
            departure_date: trip.departure_date(),
            days_until: days_until(trip.departure_date(), today),
            vehicle_class: trip.vehicle_class(),
            tour_variant: trip.tour_variant(),
            tour_name: tour.name,
            tour_days: tour.days,
            capacity: trip.capacity(),
            occupants: trip.occupants(),
            remaining_seats: trip.remaining_seats(),
            state: trip.state(),
            fill_ratio: trip.fill_ratio(),
            current_price: trip.current_price(prices),
            next_seat_price: trip.next_seat_price(prices),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTripResponse {
    pub trip: TripView,
    pub price_per_person: Price,
    pub total_cost: i64,
}

#[derive(Debug, Serialize)]
pub struct JoinTripResponse {
    pub trip: TripView,
    pub quote: JoinQuote,
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    #[serde(default = "default_passengers")]
    pub passengers: u32,
}

fn default_passengers() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub trip_id: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips", get(list_trips).post(create_trip))
        .route("/v1/trips/stream", get(stream_trip_events))
        .route("/v1/trips/{id}", get(get_trip))
        .route("/v1/trips/{id}/quote", get(quote_join))
        .route("/v1/trips/{id}/join", post(join_trip))
}

fn view(state: &AppState, trip: &Trip) -> TripView {
    let engine = state.bookings.engine();
    TripView::new(trip, engine.prices(), engine.clock().today())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/trips
/// Open a new group
async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<CreateTripResponse>), AppError> {
    let created = state.bookings.create_trip(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTripResponse {
            trip: view(&state, &created.trip),
            price_per_person: created.price_per_person,
            total_cost: created.total_cost,
        }),
    ))
}

/// GET /v1/trips?departure_date=YYYY-MM-DD&passengers=N
async fn list_trips(
    State(state): State<AppState>,
    Query(filter): Query<TripFilter>,
) -> Result<Json<Vec<TripView>>, AppError> {
    let trips = state.bookings.list_trips(&filter).await?;
    Ok(Json(trips.iter().map(|t| view(&state, t)).collect()))
}

/// GET /v1/trips/{id}
async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripView>, AppError> {
    let trip = state.bookings.get_trip(trip_id).await?;
    Ok(Json(view(&state, &trip)))
}

/// GET /v1/trips/{id}/quote?passengers=N
async fn quote_join(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<JoinQuote>, AppError> {
    let quote = state.bookings.quote_join(trip_id, query.passengers).await?;
    Ok(Json(quote))
}

/// POST /v1/trips/{id}/join
async fn join_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(req): Json<JoinTripRequest>,
) -> Result<Json<JoinTripResponse>, AppError> {
    let joined = state.bookings.join_trip(trip_id, req).await?;

    Ok(Json(JoinTripResponse {
        trip: view(&state, &joined.trip),
        quote: joined.quote,
    }))
}

/// GET /v1/trips/stream?trip_id=...
/// Server-sent events for trip creation and occupancy changes
async fn stream_trip_events(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bookings.subscribe();
    let only_trip = query.trip_id;

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) if only_trip.map_or(true, |id| id == event.trip_id()) => Event::default()
                .event(event.kind())
                .json_data(&event)
                .ok()
                .map(Ok),
            // lagged receivers just skip what they missed
            _ => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
