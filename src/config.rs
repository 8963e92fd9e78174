/*
 * Responsibility
 * - Load environment configuration (PORT, DATABASE_URL, JWT_SECRET, CORS, ...)
 * - Validate at startup: a missing required value fails the process before
 *   the listener binds, never lazily on first use
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Default credential lifetime: 30 days.
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 2_592_000;

/// Minimum secret length accepted for HS256 signing.
const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Symmetric signing secret shared by issue/verify.
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Takes the variable lookup as a function so the validation rules are
    // testable without mutating the process environment.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT").and_then(|s| s.parse().ok()).unwrap_or(3001);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        // HS256 with a short secret is not meaningfully signed.
        if jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let token_ttl_seconds = lookup("TOKEN_TTL_SECONDS")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        if token_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECONDS"));
        }

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            token_ttl_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://localhost/taskboard"),
            ("JWT_SECRET", "test-secret-test-secret-test-secret!"),
        ])
    }

    fn config_from(vars: HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn loads_with_required_values_and_defaults() {
        let config = config_from(base_vars()).unwrap();

        assert_eq!(config.addr.port(), 3001);
        assert_eq!(config.token_ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
        assert!(!config.app_env.is_production());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn missing_jwt_secret_fails_startup() {
        let mut vars = base_vars();
        vars.remove("JWT_SECRET");

        assert!(matches!(
            config_from(vars),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
    }

    #[test]
    fn short_jwt_secret_fails_startup() {
        let mut vars = base_vars();
        vars.insert("JWT_SECRET", "too-short");

        assert!(matches!(
            config_from(vars),
            Err(ConfigError::Invalid("JWT_SECRET"))
        ));
    }

    #[test]
    fn missing_database_url_fails_startup() {
        let mut vars = base_vars();
        vars.remove("DATABASE_URL");

        assert!(matches!(
            config_from(vars),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn non_positive_ttl_fails_startup() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS", "0");

        assert!(matches!(
            config_from(vars),
            Err(ConfigError::Invalid("TOKEN_TTL_SECONDS"))
        ));
    }

    #[test]
    fn app_env_parses_production_aliases() {
        assert!(AppEnv::parse(Some("production")).is_production());
        assert!(AppEnv::parse(Some("PROD")).is_production());
        assert!(!AppEnv::parse(Some("staging")).is_production());
        assert!(!AppEnv::parse(None).is_production());
    }
}
