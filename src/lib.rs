use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod slug;
pub mod upstream;

pub mod routes;
use auth::AdminUser;
use routes::{admin, pages, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{ContentRepository, PostgresRepository, RepositoryState};
pub use upstream::{HttpUpstream, MockUpstream, UpstreamState};

/// ApiDoc
///
/// OpenAPI document for every JSON endpoint, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::content::list_articles, handlers::content::get_article_by_slug,
        handlers::content::list_case_studies, handlers::content::get_case_by_slug,
        handlers::content::list_delivery_options,
        handlers::leads::submit_contact, handlers::leads::submit_quote,
        handlers::admin::login, handlers::admin::logout, handlers::admin::get_me,
        handlers::admin::list_news, handlers::admin::create_news, handlers::admin::get_news,
        handlers::admin::update_news, handlers::admin::delete_news,
        handlers::admin::list_cases, handlers::admin::create_case, handlers::admin::get_case,
        handlers::admin::update_case, handlers::admin::delete_case,
        handlers::admin::list_leads, handlers::admin::get_stats, handlers::admin::generate_news
    ),
    components(
        schemas(
            models::ContentStatus, models::Article, models::CaseStudy, models::NewsItem,
            models::CaseItem, models::DeliveryOption, models::Lead, models::AdminDashboardStats,
            models::CreateArticleRequest, models::UpdateArticleRequest,
            models::CreateCaseRequest, models::UpdateCaseRequest,
            models::LoginRequest, models::LoginResponse, models::AdminProfile,
        )
    ),
    tags(
        (name = "logistics-portal", description = "Logistics site content, leads and admin API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared, immutable container of services and configuration. Nothing in it
/// is mutated after startup, so requests never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    /// Data access: every database read and write goes through here.
    pub repo: RepositoryState,
    /// Outbound forwarding to the lead backend and the news generator.
    pub upstream: UpstreamState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for UpstreamState {
    fn from_ref(app_state: &AppState) -> UpstreamState {
        app_state.upstream.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// admin_auth_middleware
///
/// Guards the admin API: extracting `AdminUser` rejects the request with 401 before
/// any admin handler runs.
async fn admin_auth_middleware(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing tree, scoped middleware, state and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public: no middleware.
        .merge(public::public_routes())
        // Admin API: authenticated as a whole.
        .nest(
            "/api/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_auth_middleware,
            )),
        )
        // Admin pages: session gate (login page exempt inside the gate).
        .merge(
            pages::page_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                gate::admin_gate,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span so every log line of a request carries its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
