use crate::transport::http::types::{
    ApiResponse, ValidationProblem, INTERNAL_ERROR_MESSAGE, SAVE_FAILED_MESSAGE,
};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::collections::BTreeMap;

/// Infrastructure failure surfaced as a 500.
///
/// The error chain is logged; clients only get a fixed message.
///
/// Handlers return `Result<Response, ApiError>` and use `?` on store calls.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some(INTERNAL_ERROR_MESSAGE.to_string()),
            }),
        )
            .into_response()
    }
}

pub fn validation_problem(errors: BTreeMap<String, Vec<String>>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ValidationProblem::new(errors))).into_response()
}

/// The response for a commit that reported zero affected rows.
pub fn save_failed() -> Response {
    (StatusCode::BAD_REQUEST, Json(SAVE_FAILED_MESSAGE)).into_response()
}

pub fn invalid_json(err: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!(
                "Invalid JSON body: {} (expected: {{\"name\": \"...\"}})",
                err
            )),
        }),
    )
        .into_response()
}
