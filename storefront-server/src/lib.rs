//! Storefront Server - order intake and admin order management
//!
//! # Modules
//!
//! ```text
//! storefront-server/src/
//! ├── core/      # config, state, errors, server loop
//! ├── auth/      # JWT, Argon2, auth gate, rate limiting
//! ├── orders/    # order store and service
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # SQLite pool and migrations
//! └── utils/     # logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

pub use auth::{AdminIdentity, AuthGate, JwtService};
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use orders::{OrderService, OrderStore, SqliteOrderStore};
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Structured security event on the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and start logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}
