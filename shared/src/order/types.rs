//! Enumerated order vocabulary: status, payment method, product variant

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a wire string names no known value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Order Status
// ============================================================================

/// Fulfillment status of an order
///
/// `Delivered` and `Cancelled` are terminal. The allowed moves between
/// statuses live in [`super::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("order status", s))
    }
}

// ============================================================================
// Payment Method
// ============================================================================

/// How the customer intends to pay; recorded, never processed
///
/// The storefront historically sent `cod` and `bkash`; both are still
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[serde(alias = "cod")]
    CashOnDelivery,
    #[serde(alias = "bkash")]
    MobileWallet,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::MobileWallet => "mobile_wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash_on_delivery" | "cod" => Ok(PaymentMethod::CashOnDelivery),
            "mobile_wallet" | "bkash" => Ok(PaymentMethod::MobileWallet),
            _ => Err(ParseEnumError::new("payment method", s)),
        }
    }
}

// ============================================================================
// Product Variant
// ============================================================================

/// Flask color, drawn from the fixed catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Blue,
    Black,
    Gray,
    Green,
}

impl Variant {
    /// The catalog, in storefront display order
    pub const CATALOG: [Variant; 4] =
        [Variant::Blue, Variant::Black, Variant::Gray, Variant::Green];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Variant::Blue => "blue",
            Variant::Black => "black",
            Variant::Gray => "gray",
            Variant::Green => "green",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Variant::CATALOG
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| ParseEnumError::new("variant", s))
    }
}
