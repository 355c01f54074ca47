pub mod events;
pub mod rsvps;

use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::response::success;

/// Ids arrive as opaque path strings; anything that is not a valid id
/// cannot reference a stored event, so it reads as absent.
pub(crate) fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Event not found".to_string()))
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "bloom-event-service",
        version: env!("CARGO_PKG_VERSION"),
    };

    success(payload, "Event service is healthy").into_response()
}
