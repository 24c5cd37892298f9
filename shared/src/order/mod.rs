//! Order domain
//!
//! - [`types`]: status, payment method and variant enums
//! - [`model`]: persisted orders and the payloads that create or change them
//! - [`validation`]: draft order checks
//! - [`pricing`]: total computation
//! - [`lifecycle`]: allowed status transitions
//! - [`summary`]: admin dashboard aggregation

pub mod lifecycle;
pub mod model;
pub mod pricing;
pub mod summary;
pub mod types;
pub mod validation;

// Re-exports
pub use lifecycle::{ALLOWED_TRANSITIONS, TransitionError};
pub use model::{DraftOrder, NewOrder, Order, UpdateStatusRequest, ValidatedOrder};
pub use pricing::{DeliveryFee, FlatDeliveryFee, Pricing, Quote};
pub use summary::OrderSummary;
pub use types::{OrderStatus, ParseEnumError, PaymentMethod, Variant};
pub use validation::{RejectReason, Rejection, validate};
