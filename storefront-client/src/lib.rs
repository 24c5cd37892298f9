//! Storefront Client - typed HTTP client for the storefront API
//!
//! - Customer flow: [`HttpClient::submit_order`]
//! - Admin flow: [`HttpClient::login`], [`HttpClient::load_dashboard`],
//!   [`HttpClient::update_status`]
//! - UI error handling: [`ClientError::classify`]

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod storefront;

pub use admin::Dashboard;
pub use config::ApiConfig;
pub use error::{ClientError, ClientResult, Failure};
pub use http::HttpClient;
pub use storefront::{OrderSubmission, Submitted};

// Re-export shared types for convenience
pub use shared::client::{HealthResponse, LogoutResponse, TokenResponse};
pub use shared::order::{DraftOrder, Order, OrderStatus, OrderSummary, Pricing};
