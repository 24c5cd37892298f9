//! Order validator
//!
//! Checks a [`DraftOrder`] in a fixed order and stops at the first failure:
//! required fields, length limits, phone, variant, quantity, payment method.
//! Pure and synchronous; both the client and the server run it.

use super::model::{DraftOrder, ValidatedOrder};
use super::types::{PaymentMethod, Variant};
use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_PHONE_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 500;

pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 100;

/// Machine-readable reason an order was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    MissingField,
    FieldTooLong,
    InvalidPhone,
    UnknownVariant,
    InvalidQuantity,
    InvalidPaymentMethod,
    /// Produced by the pricing check, not the validator
    TotalMismatch,
}

impl RejectReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingField => "MISSING_FIELD",
            RejectReason::FieldTooLong => "FIELD_TOO_LONG",
            RejectReason::InvalidPhone => "INVALID_PHONE",
            RejectReason::UnknownVariant => "UNKNOWN_VARIANT",
            RejectReason::InvalidQuantity => "INVALID_QUANTITY",
            RejectReason::InvalidPaymentMethod => "INVALID_PAYMENT_METHOD",
            RejectReason::TotalMismatch => "TOTAL_MISMATCH",
        }
    }

    pub const fn error_code(&self) -> ErrorCode {
        match self {
            RejectReason::MissingField => ErrorCode::OrderMissingField,
            RejectReason::FieldTooLong => ErrorCode::OrderFieldTooLong,
            RejectReason::InvalidPhone => ErrorCode::OrderInvalidPhone,
            RejectReason::UnknownVariant => ErrorCode::OrderUnknownVariant,
            RejectReason::InvalidQuantity => ErrorCode::OrderInvalidQuantity,
            RejectReason::InvalidPaymentMethod => ErrorCode::OrderInvalidPaymentMethod,
            RejectReason::TotalMismatch => ErrorCode::OrderTotalMismatch,
        }
    }

    /// Inverse of [`RejectReason::error_code`]
    pub fn from_error_code(code: ErrorCode) -> Option<Self> {
        Some(match code {
            ErrorCode::OrderMissingField => RejectReason::MissingField,
            ErrorCode::OrderFieldTooLong => RejectReason::FieldTooLong,
            ErrorCode::OrderInvalidPhone => RejectReason::InvalidPhone,
            ErrorCode::OrderUnknownVariant => RejectReason::UnknownVariant,
            ErrorCode::OrderInvalidQuantity => RejectReason::InvalidQuantity,
            ErrorCode::OrderInvalidPaymentMethod => RejectReason::InvalidPaymentMethod,
            ErrorCode::OrderTotalMismatch => RejectReason::TotalMismatch,
            _ => return None,
        })
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed validation: the reason and the offending field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct Rejection {
    pub reason: RejectReason,
    pub field: &'static str,
}

impl Rejection {
    const fn new(reason: RejectReason, field: &'static str) -> Self {
        Self { reason, field }
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        AppError::new(rejection.reason.error_code())
            .with_detail("reason", rejection.reason.as_str())
            .with_detail("field", rejection.field)
    }
}

/// Strip all whitespace, including inside the number ("017 1234 5678")
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 11 digits, `01` prefix, operator digit 3-9
pub fn is_valid_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 11
        && bytes.iter().all(u8::is_ascii_digit)
        && bytes.starts_with(b"01")
        && (b'3'..=b'9').contains(&bytes[2])
}

/// Validate a draft and normalize it
pub fn validate(draft: &DraftOrder) -> Result<ValidatedOrder, Rejection> {
    let name = draft.customer_name.trim();
    let phone = draft.phone.trim();
    let address = draft.address.trim();

    for (field, value) in [("customer_name", name), ("phone", phone), ("address", address)] {
        if value.is_empty() {
            return Err(Rejection::new(RejectReason::MissingField, field));
        }
    }

    for (field, value, max) in [
        ("customer_name", name, MAX_NAME_LEN),
        ("phone", phone, MAX_PHONE_LEN),
        ("address", address, MAX_ADDRESS_LEN),
    ] {
        if value.chars().count() > max {
            return Err(Rejection::new(RejectReason::FieldTooLong, field));
        }
    }

    let phone = normalize_phone(phone);
    if !is_valid_phone(&phone) {
        return Err(Rejection::new(RejectReason::InvalidPhone, "phone"));
    }

    let color: Variant = draft
        .color
        .parse()
        .map_err(|_| Rejection::new(RejectReason::UnknownVariant, "color"))?;

    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&draft.quantity) {
        return Err(Rejection::new(RejectReason::InvalidQuantity, "quantity"));
    }
    let quantity = u32::try_from(draft.quantity)
        .map_err(|_| Rejection::new(RejectReason::InvalidQuantity, "quantity"))?;

    let payment_method: PaymentMethod = draft
        .payment_method
        .parse()
        .map_err(|_| Rejection::new(RejectReason::InvalidPaymentMethod, "payment_method"))?;

    Ok(ValidatedOrder {
        customer_name: name.to_string(),
        phone,
        address: address.to_string(),
        quantity,
        color,
        payment_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DraftOrder {
        DraftOrder {
            customer_name: "  Rahim Uddin ".into(),
            phone: "017 1234 5678".into(),
            address: "House 1, Road 2, Dhaka".into(),
            quantity: 2,
            color: "blue".into(),
            payment_method: "cod".into(),
            total_amount: None,
            status: None,
        }
    }

    fn reason_of(d: &DraftOrder) -> RejectReason {
        validate(d).unwrap_err().reason
    }

    #[test]
    fn test_valid_draft_is_normalized() {
        let order = validate(&draft()).unwrap();
        assert_eq!(order.customer_name, "Rahim Uddin");
        assert_eq!(order.phone, "01712345678");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.color, Variant::Blue);
        assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_blank_required_fields() {
        for blank in ["", "   ", "\t\n"] {
            let mut d = draft();
            d.customer_name = blank.into();
            assert_eq!(
                validate(&d).unwrap_err(),
                Rejection::new(RejectReason::MissingField, "customer_name")
            );

            let mut d = draft();
            d.phone = blank.into();
            assert_eq!(validate(&d).unwrap_err().field, "phone");
            assert_eq!(reason_of(&d), RejectReason::MissingField);

            let mut d = draft();
            d.address = blank.into();
            assert_eq!(reason_of(&d), RejectReason::MissingField);
        }
    }

    #[test]
    fn test_missing_field_wins_over_later_rules() {
        let mut d = draft();
        d.address = String::new();
        d.phone = "123".into();
        d.color = "purple".into();
        d.quantity = 0;
        assert_eq!(reason_of(&d), RejectReason::MissingField);
    }

    #[test]
    fn test_field_too_long() {
        let mut d = draft();
        d.address = "x".repeat(MAX_ADDRESS_LEN + 1);
        assert_eq!(
            validate(&d).unwrap_err(),
            Rejection::new(RejectReason::FieldTooLong, "address")
        );

        let mut d = draft();
        d.customer_name = "é".repeat(MAX_NAME_LEN);
        assert!(validate(&d).is_ok());
    }

    #[test]
    fn test_phone_rules() {
        for ok in ["01712345678", "01312345678", "01912345678", " 0171 234 5678 "] {
            let mut d = draft();
            d.phone = ok.into();
            assert!(validate(&d).is_ok(), "{ok} should pass");
        }
        for bad in [
            "01212345678",
            "01112345678",
            "0171234567",
            "017123456789",
            "11712345678",
            "0171234567a",
            "+8801712345678",
        ] {
            let mut d = draft();
            d.phone = bad.into();
            assert_eq!(reason_of(&d), RejectReason::InvalidPhone, "{bad} should fail");
        }
    }

    #[test]
    fn test_unknown_variant() {
        let mut d = draft();
        d.color = "purple".into();
        assert_eq!(reason_of(&d), RejectReason::UnknownVariant);

        d.color = String::new();
        assert_eq!(reason_of(&d), RejectReason::UnknownVariant);
    }

    #[test]
    fn test_quantity_bounds() {
        for bad in [0, -1, MAX_QUANTITY + 1, i64::MAX] {
            let mut d = draft();
            d.quantity = bad;
            assert_eq!(reason_of(&d), RejectReason::InvalidQuantity, "{bad}");
        }
        let mut d = draft();
        d.quantity = MAX_QUANTITY;
        assert_eq!(validate(&d).unwrap().quantity, 100);
    }

    #[test]
    fn test_payment_method() {
        let mut d = draft();
        d.payment_method = "bkash".into();
        assert_eq!(validate(&d).unwrap().payment_method, PaymentMethod::MobileWallet);

        d.payment_method = "credit_card".into();
        assert_eq!(reason_of(&d), RejectReason::InvalidPaymentMethod);
    }

    #[test]
    fn test_rejection_into_app_error() {
        let err: AppError = Rejection::new(RejectReason::InvalidPhone, "phone").into();
        assert_eq!(err.code, ErrorCode::OrderInvalidPhone);
        assert_eq!(err.detail_str("reason"), Some("INVALID_PHONE"));
        assert_eq!(err.detail_str("field"), Some("phone"));
    }

    #[test]
    fn test_reason_code_mapping_is_reversible() {
        for reason in [
            RejectReason::MissingField,
            RejectReason::FieldTooLong,
            RejectReason::InvalidPhone,
            RejectReason::UnknownVariant,
            RejectReason::InvalidQuantity,
            RejectReason::InvalidPaymentMethod,
            RejectReason::TotalMismatch,
        ] {
            assert_eq!(RejectReason::from_error_code(reason.error_code()), Some(reason));
        }
        assert_eq!(RejectReason::from_error_code(ErrorCode::OrderNotFound), None);
    }
}
