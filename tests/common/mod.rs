#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use logistics_portal::{
    AppConfig, AppState, MockUpstream,
    error::DatabaseError,
    models::{
        Admin, AdminDashboardStats, Article, ArticleListRow, CaseListRow, CaseStudy,
        ContentStatus, CreateArticleRequest, CreateCaseRequest, DeliveryOption, Lead,
        UpdateArticleRequest, UpdateCaseRequest,
    },
    repository::{ContentRepository, RepositoryState},
    upstream::UpstreamState,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// --- MOCK REPOSITORY IMPLEMENTATION ---

/// Canned answers for every repository call. With `fail` set, every call returns a
/// database error instead.
#[derive(Default)]
pub struct MockRepoControl {
    pub fail: bool,
    pub published_articles: Vec<ArticleListRow>,
    pub published_cases: Vec<CaseListRow>,
    pub article: Option<Article>,
    pub case: Option<CaseStudy>,
    pub delivery_options: Vec<DeliveryOption>,
    pub leads: Vec<Lead>,
    pub stats: AdminDashboardStats,
    pub admin: Option<Admin>,
    pub delete_result: bool,

    // Recorded inputs
    pub delivery_queries: Mutex<Vec<String>>,
    pub created_slugs: Mutex<Vec<String>>,
    pub list_limits: Mutex<Vec<i64>>,
}

fn db_down() -> DatabaseError {
    DatabaseError(sqlx::Error::PoolTimedOut)
}

impl MockRepoControl {
    fn check(&self) -> Result<(), DatabaseError> {
        if self.fail { Err(db_down()) } else { Ok(()) }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContentRepository for MockRepoControl {
    async fn list_published_articles(&self, limit: i64) -> Result<Vec<ArticleListRow>, DatabaseError> {
        self.check()?;
        self.list_limits.lock().unwrap().push(limit);
        Ok(self.published_articles.clone())
    }
    async fn get_published_article(&self, _slug: &str) -> Result<Option<Article>, DatabaseError> {
        self.check()?;
        Ok(self.article.clone().filter(|a| a.status == ContentStatus::Published))
    }
    async fn list_published_cases(&self, limit: i64) -> Result<Vec<CaseListRow>, DatabaseError> {
        self.check()?;
        self.list_limits.lock().unwrap().push(limit);
        Ok(self.published_cases.clone())
    }
    async fn get_published_case(&self, _slug: &str) -> Result<Option<CaseStudy>, DatabaseError> {
        self.check()?;
        Ok(self.case.clone().filter(|c| c.status == ContentStatus::Published))
    }
    async fn list_delivery_options(&self, country_slug: &str) -> Result<Vec<DeliveryOption>, DatabaseError> {
        self.delivery_queries.lock().unwrap().push(country_slug.to_string());
        self.check()?;
        Ok(if country_slug == "china" { self.delivery_options.clone() } else { vec![] })
    }

    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError> {
        self.check()?;
        Ok(self.article.clone().into_iter().collect())
    }
    async fn get_article(&self, _id: Uuid) -> Result<Option<Article>, DatabaseError> {
        self.check()?;
        Ok(self.article.clone())
    }
    async fn create_article(&self, slug: &str, req: CreateArticleRequest) -> Result<Article, DatabaseError> {
        self.check()?;
        self.created_slugs.lock().unwrap().push(slug.to_string());
        let mut article = sample_article(slug, req.status.unwrap_or_default());
        article.title = req.title;
        article.content = req.content;
        Ok(article)
    }
    async fn update_article(&self, _id: Uuid, req: UpdateArticleRequest) -> Result<Option<Article>, DatabaseError> {
        self.check()?;
        Ok(self.article.clone().map(|mut a| {
            if let Some(title) = req.title {
                a.title = title;
            }
            if let Some(status) = req.status {
                a.status = status;
            }
            a
        }))
    }
    async fn delete_article(&self, _id: Uuid) -> Result<bool, DatabaseError> {
        self.check()?;
        Ok(self.delete_result)
    }

    async fn list_cases(&self) -> Result<Vec<CaseStudy>, DatabaseError> {
        self.check()?;
        Ok(self.case.clone().into_iter().collect())
    }
    async fn get_case(&self, _id: Uuid) -> Result<Option<CaseStudy>, DatabaseError> {
        self.check()?;
        Ok(self.case.clone())
    }
    async fn create_case(&self, slug: &str, req: CreateCaseRequest) -> Result<CaseStudy, DatabaseError> {
        self.check()?;
        self.created_slugs.lock().unwrap().push(slug.to_string());
        let mut case = sample_case(slug, req.status.unwrap_or_default());
        case.title = req.title;
        case.images = req.images;
        Ok(case)
    }
    async fn update_case(&self, _id: Uuid, _req: UpdateCaseRequest) -> Result<Option<CaseStudy>, DatabaseError> {
        self.check()?;
        Ok(self.case.clone())
    }
    async fn delete_case(&self, _id: Uuid) -> Result<bool, DatabaseError> {
        self.check()?;
        Ok(self.delete_result)
    }

    async fn list_leads(&self, _limit: i64) -> Result<Vec<Lead>, DatabaseError> {
        self.check()?;
        Ok(self.leads.clone())
    }
    async fn get_stats(&self) -> Result<AdminDashboardStats, DatabaseError> {
        self.check()?;
        Ok(self.stats.clone())
    }
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, DatabaseError> {
        self.check()?;
        Ok(self.admin.clone().filter(|a| a.email == email))
    }
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, DatabaseError> {
        self.check()?;
        Ok(self.admin.clone().filter(|a| a.id == id))
    }
}

// --- Fixtures ---

pub fn sample_article(slug: &str, status: ContentStatus) -> Article {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Article {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: "Новый маршрут".to_string(),
        content: "<p>Запустили доставку</p>".to_string(),
        excerpt: None,
        category: Some("Новости".to_string()),
        image_url: None,
        status,
        created_at: at,
        updated_at: at,
    }
}

pub fn sample_case(slug: &str, status: ContentStatus) -> CaseStudy {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    CaseStudy {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: "Оборудование из Китая".to_string(),
        content: None,
        client_name: Some("ООО Ромашка".to_string()),
        country_id: Some("china".to_string()),
        cargo_type: Some("Оборудование".to_string()),
        delivery_time: Some(25),
        images: vec!["/a.jpg".to_string(), "/b.jpg".to_string()],
        status,
        created_at: at,
        updated_at: at,
    }
}

pub fn article_row(n: u128) -> ArticleListRow {
    ArticleListRow {
        id: Uuid::from_u128(n),
        slug: format!("news-{}", n),
        title: format!("News {}", n),
        content: Some("<p>Body</p>".to_string()),
        category: None,
        image_url: None,
        date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}

pub fn admin_account(password_hash: &str) -> Admin {
    Admin {
        id: Uuid::from_u128(42),
        email: "ops@example.com".to_string(),
        name: "Ops".to_string(),
        password_hash: password_hash.to_string(),
    }
}

// --- State Builders ---

pub fn state_with(repo: MockRepoControl, upstream: MockUpstream) -> AppState {
    state_with_config(Arc::new(repo), upstream, AppConfig::default())
}

/// Takes the repository behind an `Arc` so the test can inspect recorded inputs afterwards.
pub fn state_with_config(repo: Arc<MockRepoControl>, upstream: MockUpstream, config: AppConfig) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        upstream: Arc::new(upstream) as UpstreamState,
        config,
    }
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
