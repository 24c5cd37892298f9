use thiserror::Error;

use crate::auth::AuthError;
use crate::core::config::ConfigError;

/// Startup and runtime failures of the server process
///
/// Request-level failures never surface here; handlers speak
/// [`shared::AppError`].
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("auth setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for server setup
pub type Result<T> = std::result::Result<T, ServerError>;
