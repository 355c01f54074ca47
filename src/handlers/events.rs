use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::handlers::parse_event_id;
use crate::identity::Caller;
use crate::models::{CreateEventRequest, UpdateEventRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn list_events(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let events = state.events.list_events().await?;
    Ok(success(events, "Events retrieved successfully").into_response())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Caller(organizer_id): Caller,
    payload: Option<Json<CreateEventRequest>>,
) -> Result<Response, AppError> {
    let Json(request) =
        payload.ok_or_else(|| AppError::ValidationError("Payload missing".to_string()))?;
    let event = state.events.create_event(&organizer_id, request).await?;
    Ok(created(event, "Event created successfully").into_response())
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = state.events.get_event(parse_event_id(&event_id)?).await?;
    Ok(success(event, "Event retrieved successfully").into_response())
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Caller(caller_id): Caller,
    payload: Option<Json<UpdateEventRequest>>,
) -> Result<Response, AppError> {
    let Json(patch) =
        payload.ok_or_else(|| AppError::ValidationError("Payload missing".to_string()))?;
    let event = state
        .events
        .update_event(parse_event_id(&event_id)?, &caller_id, patch)
        .await?;
    Ok(success(event, "Event updated successfully").into_response())
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Caller(caller_id): Caller,
) -> Result<Response, AppError> {
    state
        .events
        .delete_event(parse_event_id(&event_id)?, &caller_id)
        .await?;
    Ok(empty_success("Event deleted successfully").into_response())
}
