//! Admin authentication
//!
//! - [`JwtService`] - token issue and validation
//! - [`AuthGate`] - login, verify, logout over the admin identity set
//! - [`AdminIdentity`] - verified session, also an axum extractor
//! - [`RateLimiter`] - per-IP login throttle

pub mod extractor;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod rate_limit;
pub mod revocation;

pub use gate::{ADMIN_ROLE, AdminAccount, AdminIdentity, AuthError, AuthGate};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use rate_limit::{RateLimiter, login_rate_limit};
pub use revocation::RevocationList;
