use crate::{AppState, handlers::admin};
use axum::{
    Router,
    routing::{get, post},
};

/// Admin API Router Module
///
/// JSON endpoints behind admin authentication. The router is wrapped in the
/// authentication middleware in `create_router`, and every handler also takes the
/// `AdminUser` extractor, so a route accidentally mounted elsewhere still rejects
/// anonymous callers.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/me
        .route("/me", get(admin::get_me))
        // GET /api/admin/stats
        // Dashboard counters (articles, cases, leads).
        .route("/stats", get(admin::get_stats))
        // GET/POST /api/admin/news
        .route("/news", get(admin::list_news).post(admin::create_news))
        // GET/PUT/DELETE /api/admin/news/{id}
        .route(
            "/news/{id}",
            get(admin::get_news)
                .put(admin::update_news)
                .delete(admin::delete_news),
        )
        // GET/POST /api/admin/cases
        .route("/cases", get(admin::list_cases).post(admin::create_case))
        // GET/PUT/DELETE /api/admin/cases/{id}
        .route(
            "/cases/{id}",
            get(admin::get_case)
                .put(admin::update_case)
                .delete(admin::delete_case),
        )
        // GET /api/admin/leads
        .route("/leads", get(admin::list_leads))
        // POST /api/admin/generate-news
        // Relays the request to the AI generation service.
        .route("/generate-news", post(admin::generate_news))
}
