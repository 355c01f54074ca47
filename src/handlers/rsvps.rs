use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use crate::handlers::parse_event_id;
use crate::identity::Caller;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success};

pub async fn confirm_rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Caller(user_id): Caller,
) -> Result<Response, AppError> {
    let rsvp = state
        .rsvps
        .confirm_rsvp(parse_event_id(&event_id)?, &user_id)
        .await?;
    Ok(created(rsvp, "RSVP confirmed successfully").into_response())
}

pub async fn withdraw_rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Caller(user_id): Caller,
) -> Result<Response, AppError> {
    state
        .rsvps
        .withdraw_rsvp(parse_event_id(&event_id)?, &user_id)
        .await?;
    Ok(empty_success("RSVP withdrawn successfully").into_response())
}
