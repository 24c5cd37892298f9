//! Pricing calculator
//!
//! `total = unit_price * quantity + delivery_fee`, in whole currency units.
//! The delivery fee comes from a [`DeliveryFee`] policy so a distance or
//! zone based fee can replace the flat one without touching callers.

use super::model::ValidatedOrder;
use super::validation::RejectReason;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNIT_PRICE: i64 = 1299;
pub const DEFAULT_DELIVERY_FEE: i64 = 0;

/// Source of the delivery fee for an order
pub trait DeliveryFee: Send + Sync {
    fn fee_for(&self, order: &ValidatedOrder) -> i64;
}

/// Same fee for every order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatDeliveryFee(pub i64);

impl Default for FlatDeliveryFee {
    fn default() -> Self {
        Self(DEFAULT_DELIVERY_FEE)
    }
}

impl DeliveryFee for FlatDeliveryFee {
    fn fee_for(&self, _order: &ValidatedOrder) -> i64 {
        self.0
    }
}

/// `unit_price * quantity + delivery_fee`, `None` on overflow
pub fn total(unit_price: i64, quantity: u32, delivery_fee: i64) -> Option<i64> {
    unit_price
        .checked_mul(i64::from(quantity))?
        .checked_add(delivery_fee)
}

/// Price breakdown for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub unit_price: i64,
    pub quantity: u32,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}

impl Quote {
    /// Reject a client-supplied total that disagrees with this quote
    pub fn verify_submitted(&self, submitted: Option<i64>) -> Result<(), AppError> {
        match submitted {
            Some(amount) if amount != self.total => {
                let reason = RejectReason::TotalMismatch;
                Err(AppError::new(reason.error_code())
                    .with_detail("reason", reason.as_str())
                    .with_detail("field", "total_amount")
                    .with_detail("expected", self.total)
                    .with_detail("submitted", amount))
            }
            _ => Ok(()),
        }
    }
}

/// Canonical pricing for the flask
pub struct Pricing<F: DeliveryFee = FlatDeliveryFee> {
    unit_price: i64,
    delivery: F,
}

impl Pricing<FlatDeliveryFee> {
    pub fn flat(unit_price: i64, delivery_fee: i64) -> Self {
        Self::new(unit_price, FlatDeliveryFee(delivery_fee))
    }
}

impl Default for Pricing<FlatDeliveryFee> {
    fn default() -> Self {
        Self::flat(DEFAULT_UNIT_PRICE, DEFAULT_DELIVERY_FEE)
    }
}

impl<F: DeliveryFee> Pricing<F> {
    pub fn new(unit_price: i64, delivery: F) -> Self {
        Self {
            unit_price,
            delivery,
        }
    }

    pub fn unit_price(&self) -> i64 {
        self.unit_price
    }

    /// Price a validated order; overflow is reported as an invalid quantity
    pub fn quote(&self, order: &ValidatedOrder) -> Result<Quote, AppError> {
        let overflow = || {
            let reason = RejectReason::InvalidQuantity;
            AppError::new(reason.error_code())
                .with_detail("reason", reason.as_str())
                .with_detail("field", "quantity")
        };

        let delivery_fee = self.delivery.fee_for(order);
        let subtotal = self
            .unit_price
            .checked_mul(i64::from(order.quantity))
            .ok_or_else(overflow)?;
        let total = total(self.unit_price, order.quantity, delivery_fee).ok_or_else(overflow)?;

        Ok(Quote {
            unit_price: self.unit_price,
            quantity: order.quantity,
            subtotal,
            delivery_fee,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::order::{PaymentMethod, Variant};

    fn order(quantity: u32) -> ValidatedOrder {
        ValidatedOrder {
            customer_name: "Rahim".into(),
            phone: "01712345678".into(),
            address: "Dhaka".into(),
            quantity,
            color: Variant::Black,
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    #[test]
    fn test_total_examples() {
        assert_eq!(total(1299, 1, 0), Some(1299));
        assert_eq!(total(1299, 3, 0), Some(3897));
        assert_eq!(total(1299, 2, 60), Some(2658));
    }

    #[test]
    fn test_total_is_monotonic_in_quantity() {
        let mut previous = 0;
        for quantity in 1..=100 {
            let t = total(DEFAULT_UNIT_PRICE, quantity, DEFAULT_DELIVERY_FEE).unwrap();
            assert!(t >= previous);
            previous = t;
        }
    }

    #[test]
    fn test_total_overflow() {
        assert_eq!(total(i64::MAX, 2, 0), None);
        assert_eq!(total(i64::MAX, 1, 1), None);
    }

    #[test]
    fn test_quote_breakdown() {
        let pricing = Pricing::flat(1299, 100);
        let quote = pricing.quote(&order(3)).unwrap();
        assert_eq!(quote.subtotal, 3897);
        assert_eq!(quote.delivery_fee, 100);
        assert_eq!(quote.total, 3997);
    }

    #[test]
    fn test_quote_overflow_is_invalid_quantity() {
        let pricing = Pricing::flat(i64::MAX, 0);
        let err = pricing.quote(&order(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidQuantity);
    }

    #[test]
    fn test_custom_delivery_policy() {
        struct PerUnit(i64);
        impl DeliveryFee for PerUnit {
            fn fee_for(&self, order: &ValidatedOrder) -> i64 {
                self.0 * i64::from(order.quantity)
            }
        }

        let pricing = Pricing::new(1000, PerUnit(50));
        assert_eq!(pricing.quote(&order(4)).unwrap().total, 4200);
    }

    #[test]
    fn test_verify_submitted_total() {
        let quote = Pricing::default().quote(&order(2)).unwrap();
        assert!(quote.verify_submitted(None).is_ok());
        assert!(quote.verify_submitted(Some(2598)).is_ok());

        let err = quote.verify_submitted(Some(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderTotalMismatch);
        assert_eq!(err.detail_str("reason"), Some("TOTAL_MISMATCH"));
        let details = err.details.unwrap();
        assert_eq!(details["expected"], 2598);
        assert_eq!(details["submitted"], 1);
    }
}
