//! Order records and the payloads that create or change them

use super::types::{OrderStatus, PaymentMethod, Variant};
use serde::{Deserialize, Deserializer, Serialize};

/// A persisted order, as returned by every order endpoint
///
/// `total_amount` is the price snapshot taken at submission and is never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub quantity: u32,
    pub color: Variant,
    pub payment_method: PaymentMethod,
    pub total_amount: i64,
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
}

/// Order as submitted by the storefront, before validation
///
/// Every field is lenient so that a missing or unknown value reaches the
/// validator and gets a specific rejection reason instead of a parse error.
/// `null` text reads as empty; a quantity that is not a JSON integer reads as
/// 0, which the validator rejects as `INVALID_QUANTITY`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftOrder {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "integer_or_zero")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub color: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub payment_method: String,
    /// Client-side total; checked against server pricing when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<i64>,
    /// Accepted for compatibility, always ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn integer_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Integer(i64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Quantity::deserialize(deserializer)? {
        Quantity::Integer(n) => n,
        Quantity::Other(_) => 0,
    })
}

/// A draft that passed validation: trimmed text, parsed enums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub quantity: u32,
    pub color: Variant,
    pub payment_method: PaymentMethod,
}

/// Everything the store needs to persist a new order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order: ValidatedOrder,
    pub total_amount: i64,
    pub idempotency_key: Option<String>,
}

/// Body of `PUT /orders/{id}`
///
/// Kept as text so an unknown status is reported as an invalid transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
        }
    }
}
