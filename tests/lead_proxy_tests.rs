mod common;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use common::{MockRepoControl, body_json, state_with};
use logistics_portal::{
    AppConfig, AppState, HttpUpstream, MockUpstream,
    extract::JsonBody,
    handlers::leads,
    repository::RepositoryState,
    upstream::UpstreamState,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// What the fake lead backend saw: the request's Content-Type and its parsed body.
type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Starts a throwaway lead backend on 127.0.0.1:0 answering `POST /api/v1/leads/`
/// with `status` and `reply`. Returns its base URL.
async fn spawn_lead_backend(status: StatusCode, reply: &'static str, seen: Seen) -> String {
    let app = Router::new().route(
        "/api/v1/leads/",
        post(move |headers: HeaderMap, body: String| {
            let seen = seen.clone();
            async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
                seen.lock().unwrap().push((content_type, parsed));
                (status, [(header::CONTENT_TYPE, "application/json")], reply)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

/// An address nothing listens on.
async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn http_state(backend: &str) -> AppState {
    AppState {
        repo: Arc::new(MockRepoControl::default()) as RepositoryState,
        upstream: Arc::new(HttpUpstream::new()) as UpstreamState,
        config: AppConfig {
            lead_api_url: logistics_portal::config::normalize_api_base(backend),
            ..AppConfig::default()
        },
    }
}

#[tokio::test]
async fn test_contact_is_forwarded_as_json_and_status_relayed() {
    let seen: Seen = Arc::default();
    let backend = spawn_lead_backend(StatusCode::CREATED, r#"{"id":7,"status":"new"}"#, seen.clone()).await;

    let response = leads::submit_contact(
        State(http_state(&backend)),
        JsonBody(json!({ "name": "Иван", "phone": "+7 900 000-00-00", "cargo": "мебель" })),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, json!({ "id": 7, "status": "new" }));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("application/json"));
    assert_eq!(seen[0].1["name"], "Иван");
    assert_eq!(seen[0].1["cargo"], "мебель");
    assert!(seen[0].1.get("source").is_none());
}

#[tokio::test]
async fn test_quote_adds_source_and_relays_upstream_errors() {
    let seen: Seen = Arc::default();
    let backend = spawn_lead_backend(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"detail":"phone is invalid"}"#,
        seen.clone(),
    )
    .await;

    let response = leads::submit_quote(
        State(http_state(&backend)),
        JsonBody(json!({ "name": "Anna", "email": "anna@example.com", "weight": 120 })),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["detail"], "phone is invalid");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1["source"], "quote");
    assert_eq!(seen[0].1["weight"], 120);
}

#[tokio::test]
async fn test_non_json_upstream_body_is_relayed_as_empty_object() {
    let seen: Seen = Arc::default();
    let backend = spawn_lead_backend(StatusCode::BAD_GATEWAY, "<html>oops</html>", seen).await;

    let response = leads::submit_contact(
        State(http_state(&backend)),
        JsonBody(json!({ "name": "A", "phone": "1" })),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn test_unreachable_backend_gives_fixed_messages() {
    let backend = closed_port_url().await;

    let contact = leads::submit_contact(
        State(http_state(&backend)),
        JsonBody(json!({ "name": "A", "phone": "1" })),
    )
    .await
    .into_response();
    assert_eq!(contact.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(contact).await, json!({ "error": "Failed to submit lead" }));

    let quote = leads::submit_quote(
        State(http_state(&backend)),
        JsonBody(json!({ "name": "A", "phone": "1" })),
    )
    .await
    .into_response();
    assert_eq!(quote.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(quote).await, json!({ "error": "Failed to calculate quote" }));
}

#[tokio::test]
async fn test_invalid_lead_never_leaves_the_site() {
    let upstream = MockUpstream::default();
    let state = state_with(MockRepoControl::default(), upstream.clone());

    let response = leads::submit_contact(State(state), JsonBody(json!({ "cargo": "tea" })))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn test_contact_goes_to_leads_endpoint() {
    let upstream = MockUpstream::replying(StatusCode::OK, json!({ "ok": true }));
    let state = state_with(MockRepoControl::default(), upstream.clone());

    let response = leads::submit_contact(State(state), JsonBody(json!({ "name": "A", "email": "a@b.c" })))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.calls()[0].0, "http://127.0.0.1:8000/api/v1/leads/");
}
