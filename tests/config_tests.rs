use logistics_portal::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

const CONFIG_VARS: &[&str] = &[
    "APP_ENV",
    "DATABASE_URL",
    "JWT_SECRET",
    "LEAD_API_URL",
    "BACKEND_URL",
    "GENERATOR_URL",
    "ADMIN_EMAIL",
    "ADMIN_PASSWORD_HASH",
    "BIND_ADDR",
    "SESSION_TTL_HOURS",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with exactly the given variables set (every other config variable
/// cleared), then restores the previous environment.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_production_without_jwt_secret_fails_fast() {
    let result = run_with_env(
        &[("APP_ENV", "production"), ("DATABASE_URL", "postgres://u:p@h/db")],
        || panic::catch_unwind(AppConfig::load).is_err(),
    );
    assert!(result, "production config must panic without JWT_SECRET");
}

#[test]
#[serial]
fn test_missing_database_url_fails_fast() {
    let result = run_with_env(&[("APP_ENV", "local")], || {
        panic::catch_unwind(AppConfig::load).is_err()
    });
    assert!(result);
}

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(&[("DATABASE_URL", "postgres://u:p@h/db")], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.session_ttl_hours, 24);
    assert_eq!(config.lead_api_url, "http://127.0.0.1:8000/api/v1");
    assert_eq!(config.generator_url, "http://localhost:3001/api/admin/generate-news");
    assert!(config.admin_email.is_none());
    assert!(!config.jwt_secret.is_empty());
}

#[test]
#[serial]
fn test_lead_api_url_wins_over_backend_url_and_is_normalized() {
    let config = run_with_env(
        &[
            ("DATABASE_URL", "postgres://u:p@h/db"),
            ("LEAD_API_URL", "https://leads.example.com/api/"),
            ("BACKEND_URL", "http://ignored:8000"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.lead_api_url, "https://leads.example.com/api/v1");
    assert_eq!(config.leads_endpoint(), "https://leads.example.com/api/v1/leads/");
}

#[test]
#[serial]
fn test_backend_url_fallback() {
    let config = run_with_env(
        &[
            ("DATABASE_URL", "postgres://u:p@h/db"),
            ("BACKEND_URL", "http://backend:8000"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.lead_api_url, "http://backend:8000/api/v1");
}

#[test]
#[serial]
fn test_production_reads_secrets_and_ignores_bad_ttl() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://u:p@h/db"),
            ("JWT_SECRET", "prod-secret"),
            ("ADMIN_EMAIL", "boss@example.com"),
            ("ADMIN_PASSWORD_HASH", ""),
            ("SESSION_TTL_HOURS", "-3"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.admin_email.as_deref(), Some("boss@example.com"));
    // Empty values count as unset.
    assert!(config.admin_password_hash.is_none());
    assert_eq!(config.session_ttl_hours, 24);
}
