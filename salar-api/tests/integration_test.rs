use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use futures_util::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use salar_api::{app, AppState};
use salar_catalog::{CapacityPolicy, PriceTable};
use salar_core::{EligibilityPolicy, FixedClock};
use salar_order::{BookingEngine, BookingService, InMemoryTripStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn date_in(days: i64) -> String {
    (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

fn test_app() -> Router {
    let engine = BookingEngine::new(
        PriceTable::default(),
        CapacityPolicy::default(),
        EligibilityPolicy::default(),
        Arc::new(FixedClock(today())),
    );
    let service = BookingService::new(engine, Arc::new(InMemoryTripStore::new()));
    app(AppState::new(service))
}

fn contact() -> Value {
    json!({ "full_name": "Ana Quispe", "email": "ana@example.com", "diet": "VEGETARIAN" })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn create_trip(app: &Router, class: &str, days: i64, passengers: u32) -> (StatusCode, Value) {
    post(
        app,
        "/v1/trips",
        json!({
            "vehicle_class": class,
            "tour_variant": "CLASSIC",
            "departure_date": date_in(days),
            "initial_passengers": passengers,
            "contact": contact(),
        }),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(&test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_eligibility_endpoint() {
    let app = test_app();

    let (status, body) = get(&app, &format!("/v1/eligibility?departure_date={}&passengers=3", date_in(3))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);
    assert_eq!(body["tier"], "URGENT");
    assert!(body["reason"].as_str().unwrap().contains("minimum group size"));

    let (_, body) = get(&app, &format!("/v1/eligibility?departure_date={}&passengers=1", date_in(6))).await;
    assert_eq!(body["eligible"], true);
    assert_eq!(body["tier"], "STANDARD");
    assert_eq!(body["days_until"], 6);

    let (_, body) = get(&app, &format!("/v1/eligibility?departure_date={}", date_in(-1))).await;
    assert_eq!(body["tier"], "BLOCKED");

    let (status, _) = get(&app, "/v1/eligibility?departure_date=tomorrow").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_price_endpoints() {
    let app = test_app();

    let (status, body) = get(&app, "/v1/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tiers"].as_array().unwrap().len(), 6);
    assert_eq!(body["tiers"][0]["price_per_person"], 800);

    let (_, body) = get(&app, "/v1/prices/3").await;
    assert_eq!(body["price_per_person"], 290);

    let (_, body) = get(&app, "/v1/prices/0").await;
    assert_eq!(body["price_per_person"], 800);

    let (_, body) = get(&app, "/v1/prices/12").await;
    assert_eq!(body["price_per_person"], 180);
}

#[tokio::test]
async fn test_catalog() {
    let (status, body) = get(&test_app(), "/v1/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle_classes"][1]["vehicle_class"], "PRIVATE");
    assert_eq!(body["vehicle_classes"][1]["capacity"], 4);
    assert_eq!(body["tours"].as_array().unwrap().len(), 3);
    assert_eq!(body["diets"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_quote_and_join_flow() {
    let app = test_app();

    let (status, body) = create_trip(&app, "STANDARD", 20, 2).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price_per_person"], 420);
    assert_eq!(body["total_cost"], 840);
    assert_eq!(body["trip"]["occupants"], 2);
    assert_eq!(body["trip"]["next_seat_price"], 290);
    let id = body["trip"]["id"].as_str().unwrap().to_string();

    let (status, quote) = get(&app, &format!("/v1/trips/{}/quote?passengers=1", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["current_price"], 420);
    assert_eq!(quote["projected_price"], 290);
    assert_eq!(quote["per_person_savings"], 130);
    assert_eq!(quote["total_cost"], 290);

    let (status, body) = post(
        &app,
        &format!("/v1/trips/{}/join", id),
        json!({ "passengers": 4, "contact": contact() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trip"]["occupants"], 6);
    assert_eq!(body["trip"]["state"], "FULL");
    assert_eq!(body["trip"]["next_seat_price"], Value::Null);
    assert_eq!(body["quote"]["total_cost"], 720);

    let (status, body) = post(
        &app,
        &format!("/v1/trips/{}/join", id),
        json!({ "passengers": 1, "contact": contact() }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("full"));
}

#[tokio::test]
async fn test_join_beyond_remaining_seats_is_rejected() {
    let app = test_app();
    let (_, body) = create_trip(&app, "STANDARD", 20, 3).await;
    let id = body["trip"]["id"].as_str().unwrap().to_string();

    let (status, _) = post(
        &app,
        &format!("/v1/trips/{}/join", id),
        json!({ "passengers": 4, "contact": contact() }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, trip) = get(&app, &format!("/v1/trips/{}", id)).await;
    assert_eq!(trip["occupants"], 3);
    assert_eq!(trip["remaining_seats"], 3);
}

#[tokio::test]
async fn test_create_rejections() {
    let app = test_app();

    let (status, _) = create_trip(&app, "PRIVATE", 20, 5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = create_trip(&app, "STANDARD", 1, 6).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["tier"], "BLOCKED");
    assert_eq!(body["days_until"], 1);

    let (status, body) = post(
        &app,
        "/v1/trips",
        json!({
            "vehicle_class": "STANDARD",
            "tour_variant": "CLASSIC",
            "departure_date": date_in(20),
            "initial_passengers": 2,
            "contact": { "full_name": "Al", "email": "ana@example.com" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("full_name"));
}

#[tokio::test]
async fn test_list_trips_with_filters() {
    let app = test_app();
    create_trip(&app, "STANDARD", 14, 3).await;
    create_trip(&app, "STANDARD", 17, 5).await;
    create_trip(&app, "PRIVATE", 21, 1).await;

    let (status, body) = get(&app, "/v1/trips").await;
    assert_eq!(status, StatusCode::OK);
    let trips = body.as_array().unwrap();
    assert_eq!(trips.len(), 3);
    assert_eq!(trips[0]["departure_date"], date_in(14));

    let (_, body) = get(&app, &format!("/v1/trips?departure_date={}", date_in(17))).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/v1/trips?passengers=3").await;
    let roomy = body.as_array().unwrap();
    assert_eq!(roomy.len(), 2);
    assert!(roomy.iter().all(|t| t["remaining_seats"].as_u64().unwrap() >= 3));
}

#[tokio::test]
async fn test_unknown_trip_is_not_found() {
    let app = test_app();
    let id = uuid::Uuid::new_v4();

    let (status, _) = get(&app, &format!("/v1/trips/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &app,
        &format!("/v1/trips/{}/join", id),
        json!({ "passengers": 1, "contact": contact() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trip_stream_only_carries_the_requested_trip() {
    let app = test_app();
    let (_, body) = create_trip(&app, "STANDARD", 20, 2).await;
    let watched = body["trip"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/v1/trips/stream?trip_id={}", watched))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );
    let mut frames = response.into_body().into_data_stream();

    let (_, other) = create_trip(&app, "PRIVATE", 25, 1).await;
    let other = other["trip"]["id"].as_str().unwrap().to_string();
    post(
        &app,
        &format!("/v1/trips/{}/join", other),
        json!({ "passengers": 1, "contact": contact() }),
    )
    .await;
    let (status, _) = post(
        &app,
        &format!("/v1/trips/{}/join", watched),
        json!({ "passengers": 3, "contact": contact() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // events arrive in publish order, so the watched join comes after the others were filtered
    let mut text = String::new();
    while !text.contains("\n\n") {
        let frame = tokio::time::timeout(std::time::Duration::from_secs(2), frames.next())
            .await
            .expect("no event within timeout")
            .expect("stream ended")
            .unwrap();
        text.push_str(std::str::from_utf8(&frame).unwrap());
    }

    assert!(!text.contains(&other));
    assert!(!text.contains("event: trip_created"));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "event: trip_joined");
    let data: Value = serde_json::from_str(lines[1].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(data["type"], "joined");
    assert_eq!(data["trip_id"], watched);
    assert_eq!(data["joined"], 3);
    assert_eq!(data["occupants"], 5);
    assert_eq!(data["price_per_person"], 195);
}
