use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{self, events, rsvps};
use crate::state::AppState;

pub fn create_routes(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:event_id/rsvp",
            post(rsvps::confirm_rsvp).delete(rsvps::withdraw_rsvp),
        );

    apply_security_headers(router)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}
