//! Error responses.
//!
//! # Responsibilities
//! - Map gate rejections to `401 Unauthorized`
//! - Keep every error body in the same `{"message": ...}` JSON shape
//!
//! # Design Decisions
//! - Rejections advertise the bearer scheme via `WWW-Authenticate`
//! - Validation details stay in the logs, never in the body

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::security::AuthError;

/// JSON body used for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Build a JSON error response.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let mut response = error_response(StatusCode::UNAUTHORIZED, self.to_string());
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            header::HeaderValue::from_static("Bearer"),
        );
        response
    }
}
