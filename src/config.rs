/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、署名 secret、token 有効期間など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 署名 secret は起動時に一度だけ読み込み、実行中に差し替えない
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;

const MIN_JWT_SECRET_BYTES: usize = 32;
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60; // 30 days
const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw
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

#[derive(Debug, PartialEq, Eq)]
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

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub jwt_secret: String,
    pub auth_issuer: String,
    pub token_ttl: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets (JWT_SECRET, credentials inside DATABASE_URL)
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("auth_issuer", &self.auth_issuer)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 5000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let sqids_min_length = var("SQIDS_MIN_LENGTH")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10);

        let sqids_alphabet = var("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let auth_issuer = var("AUTH_ISSUER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "career-guidance-api".to_string());

        let token_ttl_seconds = match var("TOKEN_TTL_SECONDS") {
            Some(s) => s
                .parse::<i64>()
                .map_err(|_| ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&token_ttl_seconds) {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECONDS"));
        }

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            cors_allowed_origins,
            sqids_min_length,
            sqids_alphabet,
            jwt_secret,
            auth_issuer,
            token_ttl: Duration::seconds(token_ttl_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let config =
            load(&[("DATABASE_URL", "postgres://localhost/app"), ("JWT_SECRET", SECRET)])
                .expect("config");

        assert_eq!(config.addr.port(), 5000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.token_ttl, Duration::days(30));
        assert_eq!(config.auth_issuer, "career-guidance-api");
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn signing_secret_is_required_and_long_enough() {
        assert_eq!(
            load(&[("DATABASE_URL", "postgres://localhost/app")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            load(&[("DATABASE_URL", "postgres://localhost/app"), ("JWT_SECRET", "short")])
                .unwrap_err(),
            ConfigError::Invalid("JWT_SECRET")
        );
    }

    #[test]
    fn token_window_must_be_finite_and_positive() {
        for bad in ["0", "-5", "forever", "999999999999"] {
            assert_eq!(
                load(&[
                    ("DATABASE_URL", "postgres://localhost/app"),
                    ("JWT_SECRET", SECRET),
                    ("TOKEN_TTL_SECONDS", bad),
                ])
                .unwrap_err(),
                ConfigError::Invalid("TOKEN_TTL_SECONDS"),
                "{bad}"
            );
        }

        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("JWT_SECRET", SECRET),
            ("TOKEN_TTL_SECONDS", "3600"),
            ("APP_ENV", "prod"),
        ])
        .expect("config");
        assert_eq!(config.token_ttl, Duration::hours(1));
        assert!(config.app_env.is_production());
    }
}
