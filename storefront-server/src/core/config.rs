use std::str::FromStr;
use std::time::Duration;

use shared::order::pricing::{DEFAULT_DELIVERY_FEE, DEFAULT_UNIT_PRICE};
use thiserror::Error;

use crate::auth::jwt::{JwtConfig, MIN_SECRET_LEN, generate_secure_printable_jwt_secret};
use crate::auth::password::is_phc_hash;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in {1} environment")]
    MissingSecret(&'static str, String),

    #[error("JWT secret must be at least 32 characters long")]
    WeakSecret,

    #[error("the default admin password cannot be used in {0} environment")]
    DefaultAdminPassword(String),

    #[error("ADMIN_PASSWORD_HASH is not a valid Argon2 PHC string")]
    InvalidPasswordHash,

    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },

    #[error("{name} has an unparsable value: {value:?}")]
    Unparsable { name: &'static str, value: String },
}

/// Admin password as configured: a ready hash or a plain password hashed at startup
#[derive(Clone)]
pub enum AdminPassword {
    Hash(String),
    Plain(String),
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminPassword::Hash(_) => f.write_str("Hash(..)"),
            AdminPassword::Plain(_) => f.write_str("Plain(..)"),
        }
    }
}

/// Login throttle settings
#[derive(Debug, Clone, Copy)]
pub struct LoginRateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

/// Server configuration
///
/// Logging is configured separately, see [`crate::utils::logger`].
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | HTTP_PORT | 8000 | |
/// | DATABASE_URL | sqlite:orders.db | |
/// | ENVIRONMENT | development | development, staging, production |
/// | ADMIN_EMAIL | admin@example.com | |
/// | ADMIN_PASSWORD_HASH | | Argon2 PHC string, preferred |
/// | ADMIN_PASSWORD | password | hashed at startup |
/// | JWT_SECRET | generated in development | falls back to SECRET_KEY |
/// | JWT_ISSUER | storefront-server | |
/// | JWT_AUDIENCE | storefront-admin | |
/// | ACCESS_TOKEN_EXPIRE_MINUTES | 30 | |
/// | UNIT_PRICE | 1299 | |
/// | DELIVERY_FEE | 0 | |
/// | IDEMPOTENCY_WINDOW_SECS | 600 | |
/// | LOGIN_DELAY_MS | 500 | |
/// | LOGIN_RATE_LIMIT | 10 | per IP per 60 s |
/// | TRUST_FORWARDED_FOR | false | throttle on `X-Forwarded-For`; only behind a proxy |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_url: String,
    pub environment: String,
    pub jwt: JwtConfig,
    pub admin_email: String,
    pub admin_password: AdminPassword,
    pub unit_price: i64,
    pub delivery_fee: i64,
    pub idempotency_window: Duration,
    pub login_delay: Duration,
    pub login_rate: LoginRateLimit,
    pub trust_forwarded_for: bool,
}

/// Parse an optional raw value; a set but unparsable value is an error, not the default
fn parse_or<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Unparsable { name, value }),
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    parse_or(name, env_string(name), default)
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env_string("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_development = environment == "development";

        let secret = match env_string("JWT_SECRET").or_else(|| env_string("SECRET_KEY")) {
            Some(secret) => secret,
            None if is_development => {
                tracing::warn!("JWT_SECRET not set, generating a temporary key for development");
                generate_secure_printable_jwt_secret()
            }
            None => return Err(ConfigError::MissingSecret("JWT_SECRET", environment)),
        };

        let admin_password = match env_string("ADMIN_PASSWORD_HASH") {
            Some(hash) => AdminPassword::Hash(hash),
            None => AdminPassword::Plain(
                env_string("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.into()),
            ),
        };

        let config = Self {
            http_port: env_or("HTTP_PORT", 8000)?,
            database_url: env_string("DATABASE_URL").unwrap_or_else(|| "sqlite:orders.db".into()),
            jwt: JwtConfig {
                secret,
                expiration_minutes: env_or("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
                issuer: env_string("JWT_ISSUER").unwrap_or_else(|| "storefront-server".into()),
                audience: env_string("JWT_AUDIENCE").unwrap_or_else(|| "storefront-admin".into()),
            },
            admin_email: env_string("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.into()),
            admin_password,
            unit_price: env_or("UNIT_PRICE", DEFAULT_UNIT_PRICE)?,
            delivery_fee: env_or("DELIVERY_FEE", DEFAULT_DELIVERY_FEE)?,
            idempotency_window: Duration::from_secs(env_or("IDEMPOTENCY_WINDOW_SECS", 600)?),
            login_delay: Duration::from_millis(env_or("LOGIN_DELAY_MS", 500)?),
            login_rate: LoginRateLimit {
                max_requests: env_or("LOGIN_RATE_LIMIT", 10)?,
                window: Duration::from_secs(60),
            },
            trust_forwarded_for: env_or("TRUST_FORWARDED_FOR", false)?,
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Development defaults without reading the environment
    pub fn development(database_url: impl Into<String>) -> Self {
        Self {
            http_port: 8000,
            database_url: database_url.into(),
            environment: "development".into(),
            jwt: JwtConfig::generated(),
            admin_email: DEFAULT_ADMIN_EMAIL.into(),
            admin_password: AdminPassword::Plain(DEFAULT_ADMIN_PASSWORD.into()),
            unit_price: DEFAULT_UNIT_PRICE,
            delivery_fee: DEFAULT_DELIVERY_FEE,
            idempotency_window: Duration::from_secs(600),
            login_delay: Duration::from_millis(500),
            login_rate: LoginRateLimit {
                max_requests: 10,
                window: Duration::from_secs(60),
            },
            trust_forwarded_for: false,
        }
    }

    /// Reject settings that are unsafe or meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            if self.is_development() {
                tracing::warn!("JWT secret is shorter than {MIN_SECRET_LEN} characters");
            } else {
                return Err(ConfigError::WeakSecret);
            }
        }

        match &self.admin_password {
            AdminPassword::Hash(hash) if !is_phc_hash(hash) => {
                return Err(ConfigError::InvalidPasswordHash);
            }
            AdminPassword::Plain(password)
                if password == DEFAULT_ADMIN_PASSWORD && !self.is_development() =>
            {
                return Err(ConfigError::DefaultAdminPassword(self.environment.clone()));
            }
            _ => {}
        }

        if self.unit_price <= 0 {
            return Err(ConfigError::OutOfRange {
                name: "UNIT_PRICE",
                value: self.unit_price,
            });
        }
        if self.delivery_fee < 0 {
            return Err(ConfigError::OutOfRange {
                name: "DELIVERY_FEE",
                value: self.delivery_fee,
            });
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(ConfigError::OutOfRange {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: self.jwt.expiration_minutes,
            });
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
