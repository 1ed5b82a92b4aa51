use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::extractor::CurrentUser;
use super::jwt::validate_token;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Rejects requests without a valid bearer token and stores the
/// authenticated user in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    let user_id = validate_token(&state.jwt, token)?;
    req.extensions_mut().insert(CurrentUser(user_id));

    Ok(next.run(req).await)
}
