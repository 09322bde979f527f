use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Publication Status ---

/// ContentStatus
///
/// Publication flag shared by articles and case studies. Only `Published` rows are
/// ever returned by the public content endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

impl ContentStatus {
    /// The literal stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown content status: {0}")]
pub struct UnknownStatus(pub String);

impl TryFrom<String> for ContentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "published" => Ok(ContentStatus::Published),
            _ => Err(UnknownStatus(value)),
        }
    }
}

// --- Database Rows ---

/// Article
///
/// A full row of the `articles` table. Returned as-is by the detail endpoint and
/// the admin API.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Article {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    /// HTML body.
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// ArticleListRow
///
/// Projection used by the public news list before it is shaped into `NewsItem`.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleListRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// CaseStudy
///
/// A full row of the `case_studies` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct CaseStudy {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: Option<String>,
    pub client_name: Option<String>,
    pub country_id: Option<String>,
    pub cargo_type: Option<String>,
    /// Delivery time in days.
    pub delivery_time: Option<i32>,
    /// Image URLs in display order.
    pub images: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CaseListRow
///
/// Projection used by the public cases list (`client_name AS client`,
/// `delivery_time AS time`).
#[derive(Debug, Clone, FromRow, Default)]
pub struct CaseListRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub client: Option<String>,
    pub country_id: Option<String>,
    pub cargo_type: Option<String>,
    pub time: Option<i32>,
}

/// DeliveryOption
///
/// One delivery type as offered for a particular country.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct DeliveryOption {
    pub slug: String,
    pub name: String,
    pub days_min: Option<i32>,
    pub days_max: Option<i32>,
    pub cost_per_kg: Option<f64>,
    pub details: Option<String>,
}

/// Lead
///
/// A submission stored by the lead backend; read-only here (admin listing).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub cargo: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin
///
/// An admin account from the `admins` table. The hash never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
pub struct AdminDashboardStats {
    pub total_articles: i64,
    pub published_articles: i64,
    pub total_cases: i64,
    pub published_cases: i64,
    pub total_leads: i64,
}

// --- Public Response Shapes ---

/// Placeholder shown when a case study has no client name.
pub const UNKNOWN_CLIENT: &str = "Не указан";
/// Placeholder shown when a case study has no destination country.
pub const DEFAULT_DIRECTION: &str = "Международная доставка";
/// Placeholder shown when a case study has no cargo type.
pub const DEFAULT_INDUSTRY: &str = "Логистика";

/// Number of characters kept in a news excerpt.
pub const EXCERPT_CHARS: usize = 180;

/// NewsItem
///
/// Public card shape returned by `GET /api/news`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct NewsItem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

impl From<ArticleListRow> for NewsItem {
    fn from(row: ArticleListRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row
                .content
                .as_deref()
                .map(|html| excerpt_from_html(html, EXCERPT_CHARS))
                .unwrap_or_default(),
            category: row.category,
            image_url: row.image_url,
            date: row.date.unwrap_or_else(Utc::now),
        }
    }
}

/// CaseItem
///
/// Public card shape returned by `GET /api/cases`. `savings` and `volume` are not
/// tracked yet and are always `null`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct CaseItem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub client: String,
    pub direction: String,
    pub industry: String,
    pub savings: Option<String>,
    pub time: Option<String>,
    pub volume: Option<String>,
}

impl From<CaseListRow> for CaseItem {
    fn from(row: CaseListRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            client: row.client.unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            direction: row.country_id.unwrap_or_else(|| DEFAULT_DIRECTION.to_string()),
            industry: row.cargo_type.unwrap_or_else(|| DEFAULT_INDUSTRY.to_string()),
            savings: None,
            // Zero days means "not filled in" and is shown as missing.
            time: row.time.filter(|days| *days != 0).map(|days| format!("{} дней", days)),
            volume: None,
        }
    }
}

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static tag pattern"));

/// excerpt_from_html
///
/// Drops every HTML tag and keeps the first `max_chars` characters (not bytes, the
/// content is mostly Cyrillic).
pub fn excerpt_from_html(html: &str, max_chars: usize) -> String {
    HTML_TAG.replace_all(html, "").chars().take(max_chars).collect()
}

// --- Request Payloads ---

/// CreateArticleRequest
///
/// Admin payload for `POST /api/admin/news`. A missing slug is derived from the title.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateArticleRequest {
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ContentStatus>,
}

/// UpdateArticleRequest
///
/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateCaseRequest {
    pub slug: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub client_name: Option<String>,
    pub country_id: Option<String>,
    pub cargo_type: Option<String>,
    pub delivery_time: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateCaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub name: String,
}

/// AdminProfile
///
/// Public identity of the signed-in admin (`GET /api/admin/me`).
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, PartialEq)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}
