use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{create_event, delete_event, events_feed, health_check, update_event};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/events", event_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config))
        .layer(create_cors_layer(config))
}

fn event_routes(state: AppState) -> Router {
    Router::new()
        .route("/feed", get(events_feed))
        .route("/create", post(create_event))
        .route("/:id/update", post(update_event).patch(update_event))
        .route("/:id/delete", post(delete_event).delete(delete_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}
