use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::{ApiError, DatabaseError},
    models::{Admin, AdminProfile},
    repository::RepositoryState,
};

/// Name of the cookie carrying the admin session JWT.
pub const SESSION_COOKIE: &str = "admin_session";

/// Identifier given to the account configured through `ADMIN_EMAIL`/`ADMIN_PASSWORD_HASH`.
pub const ENV_ADMIN_ID: &str = "env-admin";

/// Claims
///
/// Payload of an admin session token. `sub` is the admin's UUID, or `env-admin`
/// for the environment-configured account.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

/// AdminUser
///
/// The resolved identity of an authenticated admin request. Used as a handler argument,
/// it rejects the request with 401 before the handler runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<Admin> for AdminUser {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id.to_string(),
            email: admin.email,
            name: admin.name,
        }
    }
}

impl From<AdminUser> for AdminProfile {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

// --- Passwords ---

/// Hashes a password into an argon2id PHC string (the `ADMIN_PASSWORD_HASH` format).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// False for a wrong password and for a malformed stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}

// --- Tokens ---

/// issue_token
///
/// Signs an HS256 session token valid for `config.session_ttl_hours`.
pub fn issue_token(user: &AdminUser, config: &AppConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(config.session_ttl_hours)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// Returns the claims of a correctly signed, unexpired token.
pub fn decode_token(token: &str, secret: &str) -> Option<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!(error = %e, "rejected session token");
            None
        }
    }
}

/// session_token
///
/// Looks for the token in `Authorization: Bearer ...` first, then in the
/// `admin_session` cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .map(str::to_string)
        })
}

/// `Set-Cookie` value that stores a fresh session token.
pub fn session_cookie(token: &str, config: &AppConfig) -> String {
    let secure = if config.env == Env::Production { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        config.session_ttl_hours * 3600,
        secure
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

// --- Credential Checks ---

/// authenticate
///
/// Checks login credentials against the `admins` table, then against the
/// environment-configured account. A database failure is logged and the
/// environment account is still tried, so a configured admin can sign in while the
/// database is down.
pub async fn authenticate(
    repo: &RepositoryState,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Option<AdminUser> {
    match repo.find_admin_by_email(email).await {
        Ok(Some(admin)) if verify_password(password, &admin.password_hash) => {
            return Some(admin.into());
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "admin lookup failed, trying environment account"),
    }

    match (&config.admin_email, &config.admin_password_hash) {
        (Some(env_email), Some(env_hash)) if env_email == email && verify_password(password, env_hash) => {
            Some(AdminUser {
                id: ENV_ADMIN_ID.to_string(),
                email: env_email.clone(),
                name: "Admin".to_string(),
            })
        }
        _ => None,
    }
}

/// resolve_admin
///
/// Resolves the admin behind a request:
/// 1. Local bypass: in `Env::Local` an `x-admin-id` header naming an existing admin.
/// 2. Session token (Bearer or cookie), signature and expiry checked.
/// 3. Account check: the token's admin must still exist (or still be the env account).
///
/// `Ok(None)` means "not signed in"; `Err` means the account could not be checked.
pub async fn resolve_admin(
    repo: &RepositoryState,
    config: &AppConfig,
    headers: &HeaderMap,
) -> Result<Option<AdminUser>, DatabaseError> {
    if config.env == Env::Local {
        if let Some(id) = headers
            .get("x-admin-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
        {
            if let Some(admin) = repo.get_admin(id).await? {
                return Ok(Some(admin.into()));
            }
        }
    }

    let Some(claims) = session_token(headers).and_then(|t| decode_token(&t, &config.jwt_secret))
    else {
        return Ok(None);
    };

    if claims.sub == ENV_ADMIN_ID {
        let still_configured = config.admin_email.as_deref() == Some(claims.email.as_str());
        return Ok(still_configured.then(|| AdminUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }));
    }

    let Ok(id) = Uuid::parse_str(&claims.sub) else {
        return Ok(None);
    };
    Ok(repo.get_admin(id).await?.map(AdminUser::from))
}

/// AdminUser Extractor Implementation
///
/// Rejection: 401 when no valid session is present, 500 when the account lookup fails.
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        resolve_admin(&repo, &config, &parts.headers)
            .await?
            .ok_or(ApiError::Unauthorized)
    }
}
