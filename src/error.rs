use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::AuthRejection;

/// Errors visible to the HTTP caller. Storage and mail failures never end up here.
#[derive(Debug)]
pub enum AppError {
    AuthorizationMalformed,
    AuthorizationDenied,
    PayloadInvalid(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::AuthorizationMalformed => write!(f, "Bad or missing Authorization header"),
            AppError::AuthorizationDenied => write!(f, "Access denied"),
            AppError::PayloadInvalid(msg) => {
                write!(f, "Missing or malformed request form field: {msg}")
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthorizationMalformed => StatusCode::BAD_REQUEST,
            AppError::AuthorizationDenied => StatusCode::UNAUTHORIZED,
            AppError::PayloadInvalid(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::Malformed => AppError::AuthorizationMalformed,
            AuthRejection::Denied => AppError::AuthorizationDenied,
        }
    }
}
