/*
 * Responsibility
 * - Environment loading (listen port, JWT key, claim rules)
 * - Validation of the values (missing key or bad algorithm fails startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::services::auth::ValidationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
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

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Claim rules; unset means the claim is not checked.
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub revoked_token_ids: Vec<String>,

    pub access_jwt_public_key_pem: String,
    pub access_jwt_algorithm: Algorithm,
    pub access_token_leeway_seconds: u64,

    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// Reads the process environment. `.env` is loaded once by `app::run`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key -> value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let auth_issuer = non_empty("AUTH_ISSUER");
        let auth_audience = non_empty("AUTH_AUDIENCE");

        let revoked_token_ids = lookup("AUTH_REVOKED_TOKEN_IDS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let access_jwt_public_key_pem = non_empty("ACCESS_JWT_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let access_jwt_algorithm = match non_empty("ACCESS_JWT_ALGORITHM") {
            Some(v) => Algorithm::from_str(v.trim())
                .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?,
            None => Algorithm::RS256,
        };

        let access_token_leeway_seconds = match non_empty("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let cors_allow_origin = non_empty("CORS_ALLOW_ORIGIN");

        Ok(Self {
            addr,
            app_env,
            auth_issuer,
            auth_audience,
            revoked_token_ids,
            access_jwt_public_key_pem,
            access_jwt_algorithm,
            access_token_leeway_seconds,
            cors_allow_origin,
        })
    }

    /// Claim rules shared by every request.
    pub fn validation_config(&self) -> ValidationConfig {
        let mut rules = ValidationConfig::new().with_revoked_token_ids(self.revoked_token_ids.clone());
        if let Some(issuer) = &self.auth_issuer {
            rules = rules.with_issuer(issuer.clone());
        }
        if let Some(audience) = &self.auth_audience {
            rules = rules.with_audience(audience.clone());
        }
        rules
    }
}
