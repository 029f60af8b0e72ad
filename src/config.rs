//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `JWT_SECRET` - HS256 signing key for access and refresh tokens (at least 32 bytes)
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite database (default: `sqlite://api_tutorials.db?mode=rwc`)
//! - `REDIS_URL` / `REDIS_HOST` - Redis connection (enables caching if set)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` (default: `false`)
//! - `CACHE_TTL_SECONDS` - Cache entry TTL (default: 300)
//! - `JOB_QUEUE_CAPACITY` - Background job buffer size (default: 1000, min: 10)
//! - `JOB_DELAY_MS` - Simulated work per background job (default: 0)
//! - `ACCESS_TOKEN_TTL_MINUTES` / `REFRESH_TOKEN_TTL_DAYS` - Token lifetimes (30 / 7)
//! - `API_KEYS` - Comma-separated `key:name:role` triples for the DI lesson
//! - `ALLOWED_EMAIL_DOMAINS` - Comma-separated email domain allowlist
//! - `CORS_ORIGINS` - Comma-separated allowed origins, `*` for any (default: `*`)
//! - `MODEL_DIR` - Directory where ML models are persisted (default: `models`)
//! - `DB_MAX_CONNECTIONS` / `DB_CONNECT_TIMEOUT` - SQLite pool settings (5 / 30s)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// A configured API key for the dependency-injection lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyEntry {
    pub key: String,
    pub name: String,
    pub role: String,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, client IPs are read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub cache_ttl_seconds: u64,
    pub job_queue_capacity: usize,
    /// Artificial latency applied to every background job, in milliseconds.
    pub job_delay_ms: u64,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub api_keys: Vec<ApiKeyEntry>,
    pub allowed_email_domains: Vec<String>,
    pub cors_origins: Vec<String>,
    pub model_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_connect_timeout: u64,
}

impl Default for Config {
    /// Development defaults. `jwt_secret` is left empty and must be filled in.
    fn default() -> Self {
        Self {
            database_url: "sqlite://api_tutorials.db?mode=rwc".to_string(),
            redis_url: None,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            cache_ttl_seconds: 300,
            job_queue_capacity: 1000,
            job_delay_ms: 0,
            jwt_secret: String::new(),
            access_token_ttl_minutes: 30,
            refresh_token_ttl_days: 7,
            api_keys: parse_api_keys(DEFAULT_API_KEYS).unwrap_or_default(),
            allowed_email_domains: parse_list(DEFAULT_EMAIL_DOMAINS),
            cors_origins: vec!["*".to_string()],
            model_dir: PathBuf::from("models"),
            db_max_connections: 5,
            db_connect_timeout: 30,
        }
    }
}

const DEFAULT_API_KEYS: &str = "admin_key_123:admin:admin,user_key_456:user:user";
const DEFAULT_EMAIL_DOMAINS: &str = "gmail.com,outlook.com,company.com,example.com";

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or `API_KEYS` is malformed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let redis_url = Self::load_redis_url();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let cache_ttl_seconds =
            env_parse("CACHE_TTL_SECONDS").unwrap_or(defaults.cache_ttl_seconds);
        let job_queue_capacity =
            env_parse("JOB_QUEUE_CAPACITY").unwrap_or(defaults.job_queue_capacity);
        let job_delay_ms = env_parse("JOB_DELAY_MS").unwrap_or(defaults.job_delay_ms);

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let access_token_ttl_minutes =
            env_parse("ACCESS_TOKEN_TTL_MINUTES").unwrap_or(defaults.access_token_ttl_minutes);
        let refresh_token_ttl_days =
            env_parse("REFRESH_TOKEN_TTL_DAYS").unwrap_or(defaults.refresh_token_ttl_days);

        let api_keys = match env::var("API_KEYS") {
            Ok(raw) => parse_api_keys(&raw).context("Failed to parse API_KEYS")?,
            Err(_) => defaults.api_keys,
        };

        let allowed_email_domains = env::var("ALLOWED_EMAIL_DOMAINS")
            .map(|raw| parse_list(&raw))
            .unwrap_or(defaults.allowed_email_domains);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_list(&raw))
            .unwrap_or(defaults.cors_origins);

        let model_dir = env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        let db_max_connections =
            env_parse("DB_MAX_CONNECTIONS").unwrap_or(defaults.db_max_connections);
        let db_connect_timeout =
            env_parse("DB_CONNECT_TIMEOUT").unwrap_or(defaults.db_connect_timeout);

        Ok(Self {
            database_url,
            redis_url,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
            cache_ttl_seconds,
            job_queue_capacity,
            job_delay_ms,
            jwt_secret,
            access_token_ttl_minutes,
            refresh_token_ttl_days,
            api_keys,
            allowed_email_domains,
            cors_origins,
            model_dir,
            db_max_connections,
            db_connect_timeout,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or malformed.
    pub fn validate(&self) -> Result<()> {
        if self.job_queue_capacity < 10 {
            anyhow::bail!(
                "JOB_QUEUE_CAPACITY must be at least 10, got {}",
                self.job_queue_capacity
            );
        }

        if self.job_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "JOB_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.job_queue_capacity
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                redis_url
            );
        }

        if self.cache_ttl_seconds == 0 {
            anyhow::bail!("CACHE_TTL_SECONDS must be greater than 0");
        }

        if self.jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes long");
        }

        if self.access_token_ttl_minutes <= 0 || self.refresh_token_ttl_days <= 0 {
            anyhow::bail!("Token lifetimes must be positive");
        }

        if self.api_keys.is_empty() {
            anyhow::bail!("API_KEYS must contain at least one key");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Redis: {} (enabled)", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Redis: disabled");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Job queue capacity: {}", self.job_queue_capacity);
        tracing::info!("  API keys configured: {}", self.api_keys.len());
        tracing::info!("  Model directory: {}", self.model_dir.display());
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `key:name:role` triples separated by commas.
fn parse_api_keys(raw: &str) -> Result<Vec<ApiKeyEntry>> {
    parse_list(raw)
        .into_iter()
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(name), Some(role))
                    if !key.is_empty() && !name.is_empty() && !role.is_empty() =>
                {
                    Ok(ApiKeyEntry {
                        key: key.to_string(),
                        name: name.to_string(),
                        role: role.to_string(),
                    })
                }
                _ => anyhow::bail!("expected 'key:name:role', got '{}'", entry),
            }
        })
        .collect()
}

/// Masks sensitive information in connection strings for logging.
///
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let rest = &url[start + 3..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// Expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
