use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Per-field validation failures, keyed by field name. Serialized under
/// `errors` in the 400 response body.
#[derive(Debug, Default, Serialize)]
pub struct FieldErrors(pub BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Crate-wide error taxonomy. The mapping to HTTP happens exactly once,
/// in the `IntoResponse` impl below; handlers and repos only pick a variant.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed input, rejected before any mutation.
    #[error("{0}")]
    Validation(String),

    /// A write rejected by record validation or a uniqueness constraint.
    #[error("could not create user")]
    Constraint(FieldErrors),

    /// Email/password mismatch. Unknown email and wrong password both land
    /// here so the caller cannot tell them apart.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Missing or unknown access token on a guarded route.
    #[error("authentication missing or invalid")]
    LoggedOut,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "message": message }))
            }
            AppError::Constraint(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Could not create user", "errors": errors }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid email or password" }),
            ),
            AppError::LoggedOut => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Authentication missing or invalid.", "loggedOut": true }),
            ),
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error", "error": e.to_string() }),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error", "error": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
