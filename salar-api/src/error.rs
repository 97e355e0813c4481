use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use salar_core::{CoreError, EligibilityTier};
use salar_order::BookingError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    IneligibleDate {
        tier: EligibilityTier,
        reason: String,
        days_until: i64,
    },
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::IneligibleDate { tier, reason, days_until } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "departure date is not eligible",
                    "tier": tier,
                    "reason": reason,
                    "days_until": days_until,
                }),
            ),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::IneligibleDate { tier, reason, days_until } => {
                AppError::IneligibleDate { tier, reason, days_until }
            }
            BookingError::InvalidPassengerCount { .. } => AppError::ValidationError(err.to_string()),
            BookingError::TripFull(_) | BookingError::CapacityExceeded { .. } => {
                AppError::ConflictError(err.to_string())
            }
            BookingError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            BookingError::Invalid(inner) => inner.into(),
            BookingError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::ConfigError(msg) => AppError::InternalServerError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_booking_errors_map_to_statuses() {
        let status = |e: BookingError| AppError::from(e).into_response().status();

        assert_eq!(status(BookingError::TripFull(Uuid::new_v4())), StatusCode::CONFLICT);
        assert_eq!(
            status(BookingError::CapacityExceeded { requested: 4, remaining: 3 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(BookingError::InvalidPassengerCount { requested: 5, capacity: 4 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(BookingError::NotFound(Uuid::new_v4())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(BookingError::IneligibleDate {
                tier: EligibilityTier::Blocked,
                reason: "departure date is in the past".to_string(),
                days_until: -1,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(BookingError::Invalid(CoreError::ValidationError("email".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(BookingError::Store("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
