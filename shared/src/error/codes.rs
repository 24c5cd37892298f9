//! Unified error codes for the storefront
//!
//! This module defines all error codes used across the server, the client and
//! the storefront frontend. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Too many requests from one source
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Token has been revoked by logout
    TokenRevoked = 1005,

    // ==================== 2xxx: Permission ====================
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status change not allowed by the order lifecycle
    OrderInvalidTransition = 4002,
    /// Order was modified concurrently
    OrderConflict = 4003,
    /// Idempotency key already used for a different submission
    IdempotencyKeyReused = 4004,
    /// Customer name, phone or address missing
    OrderMissingField = 4101,
    /// Customer field exceeds its length limit
    OrderFieldTooLong = 4102,
    /// Phone is not a valid mobile number
    OrderInvalidPhone = 4103,
    /// Color is not in the variant catalog
    OrderUnknownVariant = 4104,
    /// Quantity out of range
    OrderInvalidQuantity = 4105,
    /// Payment method not supported
    OrderInvalidPaymentMethod = 4106,
    /// Submitted total differs from the server's price calculation
    OrderTotalMismatch = 4107,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Order store cannot be reached
    StoreUnavailable = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the caller may retry the same request unchanged
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorCode::StoreUnavailable | ErrorCode::TooManyRequests
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::TokenRevoked => "Authentication token has been revoked",

            // Permission
            ErrorCode::AdminRequired => "Administrator role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidTransition => "Order status change is not allowed",
            ErrorCode::OrderConflict => "Order was modified by another request",
            ErrorCode::IdempotencyKeyReused => {
                "Idempotency key was already used for a different order"
            }
            ErrorCode::OrderMissingField => "Name, phone and address are required",
            ErrorCode::OrderFieldTooLong => "Field is too long",
            ErrorCode::OrderInvalidPhone => "Invalid mobile number",
            ErrorCode::OrderUnknownVariant => "Unknown product variant",
            ErrorCode::OrderInvalidQuantity => "Invalid quantity",
            ErrorCode::OrderInvalidPaymentMethod => "Unsupported payment method",
            ErrorCode::OrderTotalMismatch => "Order total does not match current pricing",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreUnavailable => "Service temporarily unavailable, please try again",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            1 => Ok(ErrorCode::Unknown),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TokenRevoked),

            // Permission
            2003 => Ok(ErrorCode::AdminRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderInvalidTransition),
            4003 => Ok(ErrorCode::OrderConflict),
            4004 => Ok(ErrorCode::IdempotencyKeyReused),
            4101 => Ok(ErrorCode::OrderMissingField),
            4102 => Ok(ErrorCode::OrderFieldTooLong),
            4103 => Ok(ErrorCode::OrderInvalidPhone),
            4104 => Ok(ErrorCode::OrderUnknownVariant),
            4105 => Ok(ErrorCode::OrderInvalidQuantity),
            4106 => Ok(ErrorCode::OrderInvalidPaymentMethod),
            4107 => Ok(ErrorCode::OrderTotalMismatch),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9006 => Ok(ErrorCode::StoreUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::InvalidRequest.code(), 5);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::OrderInvalidTransition.code(), 4002);
        assert_eq!(ErrorCode::OrderInvalidPhone.code(), 4103);
        assert_eq!(ErrorCode::StoreUnavailable.code(), 9006);
    }

    #[test]
    fn test_error_code_try_from() {
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::OrderNotFound));
        assert_eq!(ErrorCode::try_from(1005), Ok(ErrorCode::TokenRevoked));
        assert_eq!(ErrorCode::try_from(4004), Ok(ErrorCode::IdempotencyKeyReused));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_error_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderTotalMismatch).unwrap();
        assert_eq!(json, "4107");

        let code: ErrorCode = serde_json::from_str("9006").unwrap();
        assert_eq!(code, ErrorCode::StoreUnavailable);
    }

    #[test]
    fn test_transient_codes() {
        assert!(ErrorCode::StoreUnavailable.is_transient());
        assert!(ErrorCode::TooManyRequests.is_transient());
        assert!(!ErrorCode::OrderInvalidPhone.is_transient());
        assert!(!ErrorCode::NotAuthenticated.is_transient());
    }

    #[test]
    fn test_store_unavailable_message_has_no_detail() {
        let msg = ErrorCode::StoreUnavailable.message();
        assert!(msg.contains("try again"));
        assert!(!msg.to_lowercase().contains("sqlite"));
    }
}
