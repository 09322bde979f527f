use crate::{AppState, handlers::pages};
use axum::{Router, routing::get};

/// Admin Pages Router Module
///
/// HTML pages of the admin panel. `create_router` puts the session gate in front of
/// all of them; the gate lets `/admin/login` through unconditionally and redirects
/// every other page to it when there is no session.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(pages::login_page))
        .route("/admin", get(pages::dashboard_page))
        .route("/admin/news", get(pages::news_page))
        .route("/admin/cases", get(pages::cases_page))
        .route("/admin/leads", get(pages::leads_page))
        .route("/admin/generate", get(pages::generate_page))
}
