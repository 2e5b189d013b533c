use std::time::Duration;

use logoloco_eachlabs::EachLabsConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Loaded once in `main` and carried in `AppState`; business logic never
/// reads the process environment directly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Credits granted when a user's balance row is first created.
    pub signup_bonus_credits: i32,
    /// Days of history shown in generation listings.
    pub history_retention_days: i64,
    /// Lowercased emails granted access to the admin surface.
    pub admin_emails: Vec<String>,
    /// Shared secret for payment webhook signatures. When unset,
    /// verification is skipped (degraded mode, logged on every delivery).
    pub polar_webhook_secret: Option<String>,
    /// Prediction API base URL.
    pub eachlabs_api_url: String,
    /// Prediction API key.
    pub eachlabs_api_key: String,
    /// Provider call timeout in milliseconds.
    pub eachlabs_timeout_ms: u64,
    /// JWT validation configuration (secret).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                              |
    /// |--------------------------|--------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                            |
    /// | `PORT`                   | `3000`                               |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`              |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                 |
    /// | `SIGNUP_BONUS_CREDITS`   | `1`                                  |
    /// | `HISTORY_RETENTION_DAYS` | `90`                                 |
    /// | `ADMIN_EMAILS`           | (empty)                              |
    /// | `POLAR_WEBHOOK_SECRET`   | (unset: verification skipped)        |
    /// | `EACHLABS_API_URL`       | `https://api.eachlabs.ai/v1/prediction` |
    /// | `EACHLABS_API_KEY`       | (empty)                              |
    /// | `EACHLABS_TIMEOUT_MS`    | `30000`                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let signup_bonus_credits: i32 = std::env::var("SIGNUP_BONUS_CREDITS")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("SIGNUP_BONUS_CREDITS must be a valid i32");

        let history_retention_days: i64 = std::env::var("HISTORY_RETENTION_DAYS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("HISTORY_RETENTION_DAYS must be a valid i64");

        let admin_emails: Vec<String> = std::env::var("ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let polar_webhook_secret = std::env::var("POLAR_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let eachlabs_api_url = std::env::var("EACHLABS_API_URL")
            .unwrap_or_else(|_| logoloco_eachlabs::client::DEFAULT_API_URL.into());

        let eachlabs_api_key = std::env::var("EACHLABS_API_KEY").unwrap_or_default();

        let eachlabs_timeout_ms: u64 = std::env::var("EACHLABS_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .expect("EACHLABS_TIMEOUT_MS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            signup_bonus_credits,
            history_retention_days,
            admin_emails,
            polar_webhook_secret,
            eachlabs_api_url,
            eachlabs_api_key,
            eachlabs_timeout_ms,
            jwt,
        }
    }

    /// Provider gateway settings derived from this configuration.
    pub fn eachlabs(&self) -> EachLabsConfig {
        EachLabsConfig {
            base_url: self.eachlabs_api_url.clone(),
            api_key: self.eachlabs_api_key.clone(),
            timeout: Duration::from_millis(self.eachlabs_timeout_ms),
        }
    }

    /// Whether this email belongs to a configured administrator.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }
}
