//! Shared types for the flask storefront
//!
//! Domain types and pure logic used by both storefront-server and
//! storefront-client: the order model, validator, pricing, lifecycle,
//! dashboard aggregation, and the unified error system.

pub mod client;
pub mod error;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
