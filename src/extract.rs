//! Request body extraction that answers in the API's own error shape.

use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// JsonBody
///
/// A JSON request body. Unlike `axum::Json` it does not insist on a
/// `Content-Type: application/json` header, and every failure becomes an
/// `ApiError`, so the caller always gets `{"error": "..."}`.
///
/// Unparseable input is `400`; well-formed JSON of the wrong shape is `422`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        parse(&bytes).map(JsonBody)
    }
}

pub(crate) fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| match e.classify() {
        Category::Data => ApiError::Validation(format!("Invalid request body: {}", e)),
        Category::Io | Category::Syntax | Category::Eof => {
            ApiError::BadRequest(format!("Malformed JSON: {}", e))
        }
    })
}
