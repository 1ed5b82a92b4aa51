//! HTTP handlers for the calendar events API
//!
//! - GET         /events/feed?start=&end=  — events visible to the caller
//! - POST        /events/create            — create event
//! - PATCH|POST  /events/:id/update        — partial update (owner only)
//! - DELETE|POST /events/:id/delete        — delete (owner only)

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::payload::EventPayload;
use crate::auth::CurrentUser;
use crate::models::event::{EventView, FeedQuery};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, ok};

/// GET /events/feed
pub async fn events_feed(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<EventView>>, AppError> {
    let events = state.events.query_feed(user_id, &query).await?;
    Ok(Json(events))
}

/// POST /events/create
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    EventPayload(input): EventPayload,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.create(user_id, input).await?;
    Ok(created(event.id))
}

/// PATCH|POST /events/:id/update
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    EventPayload(input): EventPayload,
) -> Result<impl IntoResponse, AppError> {
    let event_id = parse_event_id(&id)?;
    state.events.update(user_id, event_id, input).await?;
    Ok(ok())
}

/// DELETE|POST /events/:id/delete
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event_id = parse_event_id(&id)?;
    state.events.delete(user_id, event_id).await?;
    Ok(ok())
}

fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound(format!("Event with id '{}' was not found", raw)))
}
