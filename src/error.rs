use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// DatabaseError
///
/// The only error the repository layer produces. The wrapped `sqlx::Error` is for
/// server-side logs; it is never written into a response body.
#[derive(Debug, Error)]
#[error("database error: {0}")]
pub struct DatabaseError(#[from] pub sqlx::Error);

impl DatabaseError {
    /// True when the failure is a unique-constraint violation (duplicate slug/email).
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            &self.0,
            sqlx::Error::Database(db) if db.is_unique_violation()
        )
    }
}

/// UpstreamError
///
/// Network-level failure talking to the lead backend or the generator.
/// An upstream that answers with a non-2xx status is *not* an error; its reply is relayed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream unreachable: {0}")]
    Unreachable(String),
}

/// ApiError
///
/// Maps failures to HTTP responses with a flat `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    /// Carries the fixed, route-specific message shown to the caller.
    #[error("{0}")]
    UpstreamUnavailable(&'static str),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UpstreamUnavailable(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        tracing::error!(error = %err, "database failure");
        if err.is_unique_violation() {
            ApiError::Conflict("Slug already exists".to_string())
        } else {
            ApiError::Internal
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
