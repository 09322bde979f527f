use crate::{
    AppState,
    auth::{self, AdminUser},
    error::ApiError,
    extract::JsonBody,
    handlers::leads::relay,
    models::{
        AdminDashboardStats, AdminProfile, Article, CaseStudy, CreateArticleRequest,
        CreateCaseRequest, Lead, LoginRequest, LoginResponse, UpdateArticleRequest,
        UpdateCaseRequest,
    },
    slug::{is_valid_slug, slugify},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use uuid::Uuid;

/// Maximum number of leads shown in the admin list.
pub const ADMIN_LEADS_LIMIT: i64 = 200;

/// Picks the slug for a new record: the given one, or one derived from the title.
fn resolve_slug(given: Option<&str>, title: &str) -> Result<String, ApiError> {
    let slug = match given.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(title),
    };
    check_slug(&slug)?;
    Ok(slug)
}

fn check_slug(slug: &str) -> Result<(), ApiError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("Invalid slug '{}'", slug)))
    }
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        Err(ApiError::Validation("Title is required".to_string()))
    } else {
        Ok(())
    }
}

// --- Session ---

/// login
///
/// [Public Route] Exchanges admin credentials for a session token. The token is
/// returned in the body and set as the `admin_session` cookie used by the page gate.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    let Some(admin) =
        auth::authenticate(&state.repo, &state.config, payload.email.trim(), &payload.password).await
    else {
        tracing::warn!(email = %payload.email, "admin login rejected");
        return Err(ApiError::Unauthorized);
    };

    let token = auth::issue_token(&admin, &state.config).map_err(|e| {
        tracing::error!(error = %e, "failed to sign session token");
        ApiError::Internal
    })?;

    tracing::info!(admin = %admin.id, "admin signed in");
    let cookie = auth::session_cookie(&token, &state.config);
    let body = LoginResponse {
        token,
        email: admin.email,
        name: admin.name,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// logout
///
/// [Public Route] Clears the session cookie. Tokens are stateless, so an already issued
/// Bearer token stays valid until it expires.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses((status = 204, description = "Cookie cleared"))
)]
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, auth::clear_session_cookie())],
    )
}

/// get_me
///
/// [Admin Route] Identity of the signed-in admin.
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses((status = 200, description = "Current admin", body = AdminProfile))
)]
pub async fn get_me(admin: AdminUser) -> Json<AdminProfile> {
    Json(admin.into())
}

// --- Articles ---

/// list_news
///
/// [Admin Route] Every article, drafts included, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/news",
    responses((status = 200, description = "All articles", body = [Article]))
)]
pub async fn list_news(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.repo.list_articles().await?))
}

/// create_news
///
/// [Admin Route] Creates an article (draft unless `status` says otherwise).
#[utoipa::path(
    post,
    path = "/api/admin/news",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Created", body = Article),
        (status = 409, description = "Slug taken"),
        (status = 422, description = "Invalid title or slug")
    )
)]
pub async fn create_news(
    admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    check_title(&payload.title)?;
    let slug = resolve_slug(payload.slug.as_deref(), &payload.title)?;

    let article = state.repo.create_article(&slug, payload).await?;
    tracing::info!(admin = %admin.id, article = %article.id, %slug, "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

/// get_news
///
/// [Admin Route] One article by id, any status.
#[utoipa::path(
    get,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Found", body = Article),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_news(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError> {
    state
        .repo
        .get_article(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// update_news
///
/// [Admin Route] Partial update; omitted fields keep their value.
#[utoipa::path(
    put,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated", body = Article),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_news(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    if let Some(slug) = payload.slug.as_deref() {
        check_slug(slug)?;
    }
    if let Some(title) = payload.title.as_deref() {
        check_title(title)?;
    }

    let article = state
        .repo
        .update_article(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(admin = %admin.id, article = %id, "article updated");
    Ok(Json(article))
}

/// delete_news
///
/// [Admin Route] Deletes an article.
#[utoipa::path(
    delete,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_news(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_article(id).await? {
        tracing::info!(admin = %admin.id, article = %id, "article deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Case Studies ---

/// list_cases
///
/// [Admin Route] Every case study, drafts included, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/cases",
    responses((status = 200, description = "All case studies", body = [CaseStudy]))
)]
pub async fn list_cases(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CaseStudy>>, ApiError> {
    Ok(Json(state.repo.list_cases().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Created", body = CaseStudy),
        (status = 409, description = "Slug taken"),
        (status = 422, description = "Invalid title or slug")
    )
)]
pub async fn create_case(
    admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseStudy>), ApiError> {
    check_title(&payload.title)?;
    let slug = resolve_slug(payload.slug.as_deref(), &payload.title)?;

    let case = state.repo.create_case(&slug, payload).await?;
    tracing::info!(admin = %admin.id, case = %case.id, %slug, "case study created");
    Ok((StatusCode::CREATED, Json(case)))
}

#[utoipa::path(
    get,
    path = "/api/admin/cases/{id}",
    params(("id" = Uuid, Path, description = "Case study ID")),
    responses(
        (status = 200, description = "Found", body = CaseStudy),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_case(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseStudy>, ApiError> {
    state
        .repo
        .get_case(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[utoipa::path(
    put,
    path = "/api/admin/cases/{id}",
    params(("id" = Uuid, Path, description = "Case study ID")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Updated", body = CaseStudy),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_case(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateCaseRequest>,
) -> Result<Json<CaseStudy>, ApiError> {
    if let Some(slug) = payload.slug.as_deref() {
        check_slug(slug)?;
    }
    if let Some(title) = payload.title.as_deref() {
        check_title(title)?;
    }

    let case = state
        .repo
        .update_case(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(admin = %admin.id, case = %id, "case study updated");
    Ok(Json(case))
}

#[utoipa::path(
    delete,
    path = "/api/admin/cases/{id}",
    params(("id" = Uuid, Path, description = "Case study ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_case(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_case(id).await? {
        tracing::info!(admin = %admin.id, case = %id, "case study deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Leads & Dashboard ---

/// list_leads
///
/// [Admin Route] Latest leads recorded by the lead backend.
#[utoipa::path(
    get,
    path = "/api/admin/leads",
    responses((status = 200, description = "Latest leads", body = [Lead]))
)]
pub async fn list_leads(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    Ok(Json(state.repo.list_leads(ADMIN_LEADS_LIMIT).await?))
}

/// get_stats
///
/// [Admin Route] Dashboard counters.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, ApiError> {
    Ok(Json(state.repo.get_stats().await?))
}

/// generate_news
///
/// [Admin Route] Forwards a generation request (topic, keywords, category...) to the AI
/// generation service and relays its reply. The body is not inspected.
#[utoipa::path(
    post,
    path = "/api/admin/generate-news",
    responses(
        (status = 200, description = "Generator reply, relayed"),
        (status = 500, description = "Generator unreachable")
    )
)]
pub async fn generate_news(
    admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Response, ApiError> {
    let url = state.config.generator_url.clone();
    tracing::info!(admin = %admin.id, %url, "forwarding news generation request");

    match state.upstream.forward(&url, payload).await {
        Ok(reply) => Ok(relay(reply)),
        Err(e) => {
            tracing::error!(error = %e, %url, "news generator unreachable");
            Err(ApiError::UpstreamUnavailable("Failed to generate news"))
        }
    }
}
