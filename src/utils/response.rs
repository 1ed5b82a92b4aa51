use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::utils::error::FieldErrors;

/// Body returned by the mutation endpoints: `{ok: true}` or `{ok: true, id}`.
#[derive(Serialize)]
pub struct MutationResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ValidationFailedResponse {
    pub ok: bool,
    pub errors: FieldErrors,
}

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

pub fn success<T>(data: T, message: impl Into<String>) -> impl IntoResponse
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data: Some(data),
        message: Some(message.into()),
    };
    (StatusCode::OK, Json(body))
}

pub fn ok() -> impl IntoResponse {
    (StatusCode::OK, Json(MutationResponse { ok: true, id: None }))
}

pub fn created(id: Uuid) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(MutationResponse {
            ok: true,
            id: Some(id),
        }),
    )
}

pub fn validation_failed(errors: FieldErrors, status: StatusCode) -> Response {
    let body = ValidationFailedResponse { ok: false, errors };
    (status, Json(body)).into_response()
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code: code.to_string(),
            message: message.into(),
            details,
        },
    };

    (status, Json(body)).into_response()
}
