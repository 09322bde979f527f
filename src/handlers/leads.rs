use crate::{AppState, error::ApiError, extract::JsonBody, upstream::UpstreamReply};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Relays an upstream reply verbatim: same status, same JSON body.
pub(crate) fn relay(reply: UpstreamReply) -> Response {
    (reply.status, Json(reply.body)).into_response()
}

fn non_empty_str(payload: &Value, key: &str) -> bool {
    payload
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|v| !v.trim().is_empty())
}

/// validate_lead
///
/// Minimal shape check before anything leaves the site: a JSON object with a `name`
/// and at least one way to reach the person (`phone` or `email`). Every other field
/// passes through untouched.
pub fn validate_lead(payload: &Value) -> Result<(), ApiError> {
    if !payload.is_object() {
        return Err(ApiError::BadRequest("Lead must be a JSON object".to_string()));
    }
    if !non_empty_str(payload, "name") {
        return Err(ApiError::BadRequest("Field 'name' is required".to_string()));
    }
    if !non_empty_str(payload, "phone") && !non_empty_str(payload, "email") {
        return Err(ApiError::BadRequest(
            "Either 'phone' or 'email' is required".to_string(),
        ));
    }
    Ok(())
}

/// submit_contact
///
/// [Public Route] Forwards a contact form to the lead backend (`<LEAD_API_URL>/leads/`)
/// and answers with the backend's status and body.
#[utoipa::path(
    post,
    path = "/api/contact",
    responses(
        (status = 200, description = "Upstream reply, relayed"),
        (status = 400, description = "Malformed lead"),
        (status = 500, description = "Lead backend unreachable")
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Response, ApiError> {
    validate_lead(&payload)?;

    let url = state.config.leads_endpoint();
    match state.upstream.forward(&url, payload).await {
        Ok(reply) => Ok(relay(reply)),
        Err(e) => {
            tracing::error!(error = %e, %url, "contact lead not delivered");
            Err(ApiError::UpstreamUnavailable("Failed to submit lead"))
        }
    }
}

/// submit_quote
///
/// [Public Route] Same as `submit_contact`, with the lead tagged `"source": "quote"`.
#[utoipa::path(
    post,
    path = "/api/quote",
    responses(
        (status = 200, description = "Upstream reply, relayed"),
        (status = 400, description = "Malformed lead"),
        (status = 500, description = "Lead backend unreachable")
    )
)]
pub async fn submit_quote(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<Value>,
) -> Result<Response, ApiError> {
    validate_lead(&payload)?;

    if let Some(fields) = payload.as_object_mut() {
        fields.insert("source".to_string(), Value::String("quote".to_string()));
    }

    let url = state.config.leads_endpoint();
    match state.upstream.forward(&url, payload).await {
        Ok(reply) => Ok(relay(reply)),
        Err(e) => {
            tracing::error!(error = %e, %url, "quote lead not delivered");
            Err(ApiError::UpstreamUnavailable("Failed to calculate quote"))
        }
    }
}
