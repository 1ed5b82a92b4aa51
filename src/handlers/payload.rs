use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};

use crate::models::event::EventInput;
use crate::utils::error::{AppError, FieldErrors, NON_FIELD_ERRORS};

/// Event fields from either a JSON body (calendar drag/resize) or a
/// form-encoded body (modal form).
#[derive(Debug, Clone, Default)]
pub struct EventPayload(pub EventInput);

#[async_trait]
impl<S> FromRequest<S> for EventPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(input) = Json::<EventInput>::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            Ok(Self(input))
        } else {
            let Form(input) = Form::<EventInput>::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            Ok(Self(input))
        }
    }
}

fn malformed(reason: String) -> AppError {
    AppError::ValidationError(FieldErrors::single(NON_FIELD_ERRORS, reason))
}
