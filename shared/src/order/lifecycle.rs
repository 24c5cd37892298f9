//! Order lifecycle state machine
//!
//! ```text
//! pending -> confirmed -> shipped -> delivered
//!    |           |
//!    +-----------+--> cancelled
//! ```
//!
//! Anything not in [`ALLOWED_TRANSITIONS`] is rejected, including moving an
//! order to the status it already has.

use super::types::OrderStatus;
use crate::error::AppError;

/// Every permitted `(from, to)` move
pub const ALLOWED_TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Pending, OrderStatus::Confirmed),
    (OrderStatus::Pending, OrderStatus::Cancelled),
    (OrderStatus::Confirmed, OrderStatus::Shipped),
    (OrderStatus::Confirmed, OrderStatus::Cancelled),
    (OrderStatus::Shipped, OrderStatus::Delivered),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("unknown order status: {0}")]
    UnknownStatus(String),
    #[error("cannot move order from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::UnknownStatus(to) => AppError::invalid_transition("unknown", to),
            TransitionError::NotAllowed { from, to } => {
                AppError::invalid_transition(from.as_str(), to.as_str())
            }
        }
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    ALLOWED_TRANSITIONS.contains(&(from, to))
}

/// Statuses reachable in one step from `from`
pub fn next_statuses(from: OrderStatus) -> impl Iterator<Item = OrderStatus> {
    ALLOWED_TRANSITIONS
        .iter()
        .filter(move |(f, _)| *f == from)
        .map(|(_, to)| *to)
}

/// Check a move, returning the new status
pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, TransitionError> {
    if can_transition(from, to) {
        Ok(to)
    } else {
        Err(TransitionError::NotAllowed { from, to })
    }
}

/// Parse a requested target status from the wire
pub fn parse_target(raw: &str) -> Result<OrderStatus, TransitionError> {
    raw.parse()
        .map_err(|_| TransitionError::UnknownStatus(raw.to_string()))
}
