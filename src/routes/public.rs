use crate::{
    AppState,
    handlers::{admin, content, leads},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints open to any client. Content reads must only ever expose rows whose
/// status is `published`; that filter lives in the repository queries.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/news
        // Latest published articles as cards (cached publicly, empty list on DB failure).
        .route("/api/news", get(content::list_articles))
        // GET /api/news/{slug}
        .route("/api/news/{slug}", get(content::get_article_by_slug))
        // GET /api/cases
        .route("/api/cases", get(content::list_case_studies))
        // GET /api/cases/{slug}
        .route("/api/cases/{slug}", get(content::get_case_by_slug))
        // GET /api/delivery-options?country=...
        .route("/api/delivery-options", get(content::list_delivery_options))
        // POST /api/contact, /api/quote
        // Lead forms, relayed to the lead backend.
        .route("/api/contact", post(leads::submit_contact))
        .route("/api/quote", post(leads::submit_quote))
        // POST /api/admin/login, /api/admin/logout
        // Session endpoints must be reachable before a session exists.
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
}
