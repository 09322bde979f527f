use crate::error::DatabaseError;
use crate::models::{
    Admin, AdminDashboardStats, Article, ArticleListRow, CaseListRow, CaseStudy, ContentStatus,
    CreateArticleRequest, CreateCaseRequest, DeliveryOption, Lead, UpdateArticleRequest,
    UpdateCaseRequest,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Maximum rows returned by the public list endpoints.
pub const PUBLIC_LIST_LIMIT: i64 = 50;

/// ContentRepository Trait
///
/// The single data-access entry point used by every route. Each statement is fixed SQL
/// with positional `$n` parameters; caller-supplied values are only ever bound, never
/// formatted into the query text.
///
/// Every method surfaces failures as `DatabaseError`. What a failure turns into (an empty
/// list, a 500) is the caller's decision.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    // --- Public Content (published only) ---
    async fn list_published_articles(&self, limit: i64) -> Result<Vec<ArticleListRow>, DatabaseError>;
    async fn get_published_article(&self, slug: &str) -> Result<Option<Article>, DatabaseError>;
    async fn list_published_cases(&self, limit: i64) -> Result<Vec<CaseListRow>, DatabaseError>;
    async fn get_published_case(&self, slug: &str) -> Result<Option<CaseStudy>, DatabaseError>;
    // No status concept: every joined row for the country is returned.
    async fn list_delivery_options(&self, country_slug: &str) -> Result<Vec<DeliveryOption>, DatabaseError>;

    // --- Admin: Articles (any status) ---
    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError>;
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, DatabaseError>;
    async fn create_article(&self, slug: &str, req: CreateArticleRequest) -> Result<Article, DatabaseError>;
    // Uses COALESCE: `None` fields keep their stored value.
    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> Result<Option<Article>, DatabaseError>;
    async fn delete_article(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // --- Admin: Case Studies (any status) ---
    async fn list_cases(&self) -> Result<Vec<CaseStudy>, DatabaseError>;
    async fn get_case(&self, id: Uuid) -> Result<Option<CaseStudy>, DatabaseError>;
    async fn create_case(&self, slug: &str, req: CreateCaseRequest) -> Result<CaseStudy, DatabaseError>;
    async fn update_case(&self, id: Uuid, req: UpdateCaseRequest) -> Result<Option<CaseStudy>, DatabaseError>;
    async fn delete_case(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // --- Admin: Leads, Stats, Accounts ---
    async fn list_leads(&self, limit: i64) -> Result<Vec<Lead>, DatabaseError>;
    async fn get_stats(&self) -> Result<AdminDashboardStats, DatabaseError>;
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError>;
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, DatabaseError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn ContentRepository>;

/// PostgresRepository
///
/// `ContentRepository` backed by a PostgreSQL connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ARTICLE_COLUMNS: &str =
    "id, slug, title, content, excerpt, category, image_url, status, created_at, updated_at";

const CASE_COLUMNS: &str = "id, slug, title, content, client_name, country_id, cargo_type, \
     delivery_time, images, status, created_at, updated_at";

#[async_trait]
impl ContentRepository for PostgresRepository {
    /// list_published_articles
    ///
    /// Newest first. `created_at AS date` matches the public card field name.
    async fn list_published_articles(&self, limit: i64) -> Result<Vec<ArticleListRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ArticleListRow>(
            r#"
            SELECT id, slug, title, content, category, image_url, created_at AS date
            FROM articles
            WHERE status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(ContentStatus::Published.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_published_article(&self, slug: &str) -> Result<Option<Article>, DatabaseError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1 AND status = $2 LIMIT 1"
        );
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(slug)
            .bind(ContentStatus::Published.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// list_published_cases
    ///
    /// Renames `client_name → client` and `delivery_time → time` in SQL; placeholder
    /// defaults are applied later by `CaseItem::from`.
    async fn list_published_cases(&self, limit: i64) -> Result<Vec<CaseListRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CaseListRow>(
            r#"
            SELECT id, slug, title, client_name AS client, country_id, cargo_type,
                   delivery_time AS time
            FROM case_studies
            WHERE status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(ContentStatus::Published.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_published_case(&self, slug: &str) -> Result<Option<CaseStudy>, DatabaseError> {
        let sql = format!(
            "SELECT {CASE_COLUMNS} FROM case_studies WHERE slug = $1 AND status = $2 LIMIT 1"
        );
        let row = sqlx::query_as::<_, CaseStudy>(&sql)
            .bind(slug)
            .bind(ContentStatus::Published.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// list_delivery_options
    ///
    /// Joins the delivery type catalog with the per-country content. `cost_per_kg` is
    /// NUMERIC in the schema and is cast to float8 for transport.
    async fn list_delivery_options(&self, country_slug: &str) -> Result<Vec<DeliveryOption>, DatabaseError> {
        let rows = sqlx::query_as::<_, DeliveryOption>(
            r#"
            SELECT dt.slug, dt.name, dc.days_min, dc.days_max,
                   dc.cost_per_kg::float8 AS cost_per_kg, dc.details
            FROM delivery_content dc
            JOIN delivery_types dt ON dc.delivery_type_id = dt.id
            JOIN countries c ON dc.country_id = c.id
            WHERE c.slug = $1
            "#,
        )
        .bind(country_slug)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // --- ADMIN: ARTICLES ---

    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Article>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, DatabaseError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        Ok(sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// create_article
    ///
    /// New articles default to `draft` so nothing is published by accident.
    async fn create_article(&self, slug: &str, req: CreateArticleRequest) -> Result<Article, DatabaseError> {
        let sql = format!(
            "INSERT INTO articles (id, slug, title, content, excerpt, category, image_url, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&sql)
            .bind(Uuid::new_v4())
            .bind(slug)
            .bind(req.title)
            .bind(req.content)
            .bind(req.excerpt)
            .bind(req.category)
            .bind(req.image_url)
            .bind(req.status.unwrap_or_default().as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(article)
    }

    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> Result<Option<Article>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE articles
            SET slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                excerpt = COALESCE($5, excerpt),
                category = COALESCE($6, category),
                image_url = COALESCE($7, image_url),
                status = COALESCE($8, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        );
        let article = sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(req.slug)
            .bind(req.title)
            .bind(req.content)
            .bind(req.excerpt)
            .bind(req.category)
            .bind(req.image_url)
            .bind(req.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(article)
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let res = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- ADMIN: CASE STUDIES ---

    async fn list_cases(&self) -> Result<Vec<CaseStudy>, DatabaseError> {
        let sql = format!("SELECT {CASE_COLUMNS} FROM case_studies ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, CaseStudy>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_case(&self, id: Uuid) -> Result<Option<CaseStudy>, DatabaseError> {
        let sql = format!("SELECT {CASE_COLUMNS} FROM case_studies WHERE id = $1");
        Ok(sqlx::query_as::<_, CaseStudy>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_case(&self, slug: &str, req: CreateCaseRequest) -> Result<CaseStudy, DatabaseError> {
        let sql = format!(
            "INSERT INTO case_studies (id, slug, title, content, client_name, country_id, cargo_type, \
             delivery_time, images, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW()) \
             RETURNING {CASE_COLUMNS}"
        );
        let case = sqlx::query_as::<_, CaseStudy>(&sql)
            .bind(Uuid::new_v4())
            .bind(slug)
            .bind(req.title)
            .bind(req.content)
            .bind(req.client_name)
            .bind(req.country_id)
            .bind(req.cargo_type)
            .bind(req.delivery_time)
            .bind(req.images)
            .bind(req.status.unwrap_or_default().as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(case)
    }

    async fn update_case(&self, id: Uuid, req: UpdateCaseRequest) -> Result<Option<CaseStudy>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE case_studies
            SET slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                client_name = COALESCE($5, client_name),
                country_id = COALESCE($6, country_id),
                cargo_type = COALESCE($7, cargo_type),
                delivery_time = COALESCE($8, delivery_time),
                images = COALESCE($9, images),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CASE_COLUMNS}
            "#
        );
        let case = sqlx::query_as::<_, CaseStudy>(&sql)
            .bind(id)
            .bind(req.slug)
            .bind(req.title)
            .bind(req.content)
            .bind(req.client_name)
            .bind(req.country_id)
            .bind(req.cargo_type)
            .bind(req.delivery_time)
            .bind(req.images)
            .bind(req.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(case)
    }

    async fn delete_case(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let res = sqlx::query("DELETE FROM case_studies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- ADMIN: LEADS, STATS, ACCOUNTS ---

    async fn list_leads(&self, limit: i64) -> Result<Vec<Lead>, DatabaseError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, name, phone, email, country, cargo, source, created_at
            FROM leads
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    /// get_stats
    ///
    /// All dashboard counters in one round trip.
    async fn get_stats(&self) -> Result<AdminDashboardStats, DatabaseError> {
        let (total_articles, published_articles, total_cases, published_cases, total_leads) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM articles),
                    (SELECT COUNT(*) FROM articles WHERE status = $1),
                    (SELECT COUNT(*) FROM case_studies),
                    (SELECT COUNT(*) FROM case_studies WHERE status = $1),
                    (SELECT COUNT(*) FROM leads)
                "#,
            )
            .bind(ContentStatus::Published.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminDashboardStats {
            total_articles,
            published_articles,
            total_cases,
            published_cases,
            total_leads,
        })
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError> {
        Ok(sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, DatabaseError> {
        Ok(sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
