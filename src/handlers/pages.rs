use crate::{auth::AdminUser, error::ApiError};
use axum::{Extension, response::Html};
use serde::Serialize;
use std::{error::Error as _, sync::LazyLock};
use tera::{Context, Tera};

#[derive(Serialize)]
struct NavItem {
    href: &'static str,
    label: &'static str,
}

/// Sidebar entries of the admin shell.
const NAV: &[NavItem] = &[
    NavItem { href: "/admin", label: "Панель" },
    NavItem { href: "/admin/news", label: "Новости" },
    NavItem { href: "/admin/cases", label: "Кейсы" },
    NavItem { href: "/admin/leads", label: "Заявки" },
    NavItem { href: "/admin/generate", label: "Генерация" },
];

/// Admin templates, compiled into the binary. `.html` names keep Tera's autoescape on.
static TEMPLATES: LazyLock<Tera> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("admin/base.html", include_str!("../../templates/admin/base.html")),
        ("admin/login.html", include_str!("../../templates/admin/login.html")),
        ("admin/loading.html", include_str!("../../templates/admin/loading.html")),
        ("admin/shell.html", include_str!("../../templates/admin/shell.html")),
        ("admin/dashboard.html", include_str!("../../templates/admin/dashboard.html")),
        ("admin/news.html", include_str!("../../templates/admin/news.html")),
        ("admin/cases.html", include_str!("../../templates/admin/cases.html")),
        ("admin/leads.html", include_str!("../../templates/admin/leads.html")),
        ("admin/generate.html", include_str!("../../templates/admin/generate.html")),
    ])
    .expect("admin templates must parse");
    tera
});

fn render(template: &str, context: &Context) -> Result<Html<String>, ApiError> {
    TEMPLATES.render(template, context).map(Html).map_err(|e| {
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        tracing::error!(template, error = %message, "failed to render admin page");
        ApiError::Internal
    })
}

/// Renders a page inside the admin shell (sidebar + content area). Only ever called
/// for an admin the gate has already resolved.
fn shell(
    admin: &AdminUser,
    template: &str,
    current: &str,
    title: &str,
) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("nav", NAV);
    context.insert("current", current);
    context.insert("admin_email", &admin.email);
    render(template, &context)
}

/// The login form. Reachable without a session.
pub async fn login_page() -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("title", "Вход");
    render("admin/login.html", &context)
}

/// Placeholder shown while the session cannot be resolved; reloads itself.
pub fn loading_page() -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("title", "Загрузка");
    render("admin/loading.html", &context)
}

pub async fn dashboard_page(
    Extension(admin): Extension<AdminUser>,
) -> Result<Html<String>, ApiError> {
    shell(&admin, "admin/dashboard.html", "/admin", "Панель")
}

pub async fn news_page(
    Extension(admin): Extension<AdminUser>,
) -> Result<Html<String>, ApiError> {
    shell(&admin, "admin/news.html", "/admin/news", "Новости")
}

pub async fn cases_page(
    Extension(admin): Extension<AdminUser>,
) -> Result<Html<String>, ApiError> {
    shell(&admin, "admin/cases.html", "/admin/cases", "Кейсы")
}

pub async fn leads_page(
    Extension(admin): Extension<AdminUser>,
) -> Result<Html<String>, ApiError> {
    shell(&admin, "admin/leads.html", "/admin/leads", "Заявки")
}

pub async fn generate_page(
    Extension(admin): Extension<AdminUser>,
) -> Result<Html<String>, ApiError> {
    shell(&admin, "admin/generate.html", "/admin/generate", "Генерация новостей")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(email: &str) -> AdminUser {
        AdminUser {
            id: "1".into(),
            email: email.into(),
            name: "X".into(),
        }
    }

    #[test]
    fn shell_escapes_admin_email_and_marks_current_page() {
        let Html(page) =
            shell(&admin("<x>@y.z"), "admin/news.html", "/admin/news", "Новости").unwrap();
        assert!(page.contains("&lt;x&gt;@y.z"));
        assert!(!page.contains("<x>@y.z"));
        assert!(page.contains("<a href=\"/admin/news\" class=\"active\">"));
        assert!(page.contains("<a href=\"/admin/cases\">"));
        assert!(page.contains("data-endpoint=\"/api/admin/news\""));
    }

    #[test]
    fn every_shell_page_renders() {
        for (template, current) in [
            ("admin/dashboard.html", "/admin"),
            ("admin/news.html", "/admin/news"),
            ("admin/cases.html", "/admin/cases"),
            ("admin/leads.html", "/admin/leads"),
            ("admin/generate.html", "/admin/generate"),
        ] {
            let Html(page) = shell(&admin("ops@example.com"), template, current, "T").unwrap();
            assert!(page.contains("sidebar"), "{template}");
            assert!(page.contains("ops@example.com"), "{template}");
        }
    }

    #[test]
    fn login_and_loading_pages_have_no_shell() {
        let Html(login) = render("admin/login.html", &{
            let mut c = Context::new();
            c.insert("title", "Вход");
            c
        })
        .unwrap();
        assert!(login.contains("data-endpoint=\"/api/admin/login\""));
        assert!(!login.contains("sidebar"));

        let Html(loading) = loading_page().unwrap();
        assert!(loading.contains("<meta http-equiv=\"refresh\" content=\"2\">"));
        assert!(loading.contains("Загрузка..."));
    }
}
