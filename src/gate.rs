use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, auth::{AdminUser, resolve_admin}, handlers::pages};

/// Path of the admin login page; the only `/admin/*` page reachable without a session.
pub const LOGIN_PATH: &str = "/admin/login";

/// SessionStatus
///
/// Where the admin session stands for the current request.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// The session could not be resolved yet (account lookup failed).
    Loading,
    Authenticated(AdminUser),
    Unauthenticated,
}

/// GateDecision
///
/// What the admin page gate does with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Login page: always rendered, whatever the session state.
    RenderLogin,
    RedirectToLogin,
    RenderLoading,
    /// Protected page: rendered inside the admin shell for this admin.
    RenderShell(AdminUser),
}

fn is_login_path(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    trimmed == LOGIN_PATH
}

/// decide
///
/// The gate's transition function. The login page is checked first so an
/// unauthenticated visit to it can never loop back into a redirect.
pub fn decide(path: &str, status: &SessionStatus) -> GateDecision {
    if is_login_path(path) {
        return GateDecision::RenderLogin;
    }
    match status {
        SessionStatus::Unauthenticated => GateDecision::RedirectToLogin,
        SessionStatus::Loading => GateDecision::RenderLoading,
        SessionStatus::Authenticated(admin) => GateDecision::RenderShell(admin.clone()),
    }
}

/// admin_gate
///
/// Middleware in front of every `/admin/*` HTML page. The resolved admin is handed to
/// the page handler through request extensions; page handlers never look the session
/// up themselves.
///
/// This guards pages only. The `/api/admin/*` routes authenticate on their own through
/// the `AdminUser` extractor.
pub async fn admin_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let status = match resolve_admin(&state.repo, &state.config, request.headers()).await {
        Ok(Some(admin)) => SessionStatus::Authenticated(admin),
        Ok(None) => SessionStatus::Unauthenticated,
        Err(e) => {
            tracing::error!(error = %e, "admin session lookup failed");
            SessionStatus::Loading
        }
    };

    let path = request.uri().path().to_string();
    match decide(&path, &status) {
        GateDecision::RenderLogin => next.run(request).await,
        GateDecision::RedirectToLogin => {
            tracing::debug!(%path, "no admin session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        GateDecision::RenderLoading => pages::loading_page().into_response(),
        GateDecision::RenderShell(admin) => {
            request.extensions_mut().insert(admin);
            next.run(request).await
        }
    }
}
