use crate::{
    AppState,
    error::ApiError,
    models::{Article, CaseItem, CaseStudy, DeliveryOption, NewsItem},
    repository::PUBLIC_LIST_LIMIT,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Shared caches may serve a list for 60s, then stale for up to 120s more while revalidating.
pub const PUBLIC_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=120";

/// DeliveryFilter
///
/// Query parameters for `GET /api/delivery-options`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliveryFilter {
    /// Country slug, e.g. `china`.
    pub country: Option<String>,
}

fn cached_json<T: Serialize>(items: Vec<T>) -> Response {
    (
        [(header::CACHE_CONTROL, PUBLIC_CACHE_CONTROL)],
        Json(items),
    )
        .into_response()
}

/// list_articles
///
/// [Public Route] Newest published articles as news cards, at most 50.
///
/// A database failure is logged and answered with `200 []` so pages still render.
#[utoipa::path(
    get,
    path = "/api/news",
    responses((status = 200, description = "Published news", body = [NewsItem]))
)]
pub async fn list_articles(State(state): State<AppState>) -> Response {
    match state.repo.list_published_articles(PUBLIC_LIST_LIMIT).await {
        Ok(rows) => {
            let items: Vec<NewsItem> = rows
                .into_iter()
                .take(PUBLIC_LIST_LIMIT as usize)
                .map(NewsItem::from)
                .collect();
            cached_json(items)
        }
        Err(e) => {
            tracing::error!(error = %e, "news list unavailable, serving empty list");
            Json(Vec::<NewsItem>::new()).into_response()
        }
    }
}

/// list_case_studies
///
/// [Public Route] Newest published case studies as cards, at most 50. Same failure
/// policy as `list_articles`.
#[utoipa::path(
    get,
    path = "/api/cases",
    responses((status = 200, description = "Published case studies", body = [CaseItem]))
)]
pub async fn list_case_studies(State(state): State<AppState>) -> Response {
    match state.repo.list_published_cases(PUBLIC_LIST_LIMIT).await {
        Ok(rows) => {
            let items: Vec<CaseItem> = rows
                .into_iter()
                .take(PUBLIC_LIST_LIMIT as usize)
                .map(CaseItem::from)
                .collect();
            cached_json(items)
        }
        Err(e) => {
            tracing::error!(error = %e, "case list unavailable, serving empty list");
            Json(Vec::<CaseItem>::new()).into_response()
        }
    }
}

/// get_article_by_slug
///
/// [Public Route] One published article. Drafts and unknown slugs are both 404.
#[utoipa::path(
    get,
    path = "/api/news/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Found", body = Article),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_article_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, ApiError> {
    state
        .repo
        .get_published_article(&slug)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// get_case_by_slug
///
/// [Public Route] One published case study.
#[utoipa::path(
    get,
    path = "/api/cases/{slug}",
    params(("slug" = String, Path, description = "Case study slug")),
    responses(
        (status = 200, description = "Found", body = CaseStudy),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_case_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CaseStudy>, ApiError> {
    state
        .repo
        .get_published_case(&slug)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// list_delivery_options
///
/// [Public Route] Delivery types offered for a country. Unknown or missing country
/// yields `[]`, never an error.
#[utoipa::path(
    get,
    path = "/api/delivery-options",
    params(DeliveryFilter),
    responses((status = 200, description = "Delivery options", body = [DeliveryOption]))
)]
pub async fn list_delivery_options(
    State(state): State<AppState>,
    Query(filter): Query<DeliveryFilter>,
) -> Json<Vec<DeliveryOption>> {
    let Some(country) = filter.country.filter(|c| !c.is_empty()) else {
        return Json(vec![]);
    };

    match state.repo.list_delivery_options(&country).await {
        Ok(options) => Json(options),
        Err(e) => {
            tracing::error!(error = %e, %country, "delivery options unavailable");
            Json(vec![])
        }
    }
}
