//! Admin aggregator: dashboard statistics over a set of orders

use super::model::Order;
use super::types::OrderStatus;
use serde::{Deserialize, Serialize};

/// Counts per status plus revenue from delivered orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub total_revenue: i64,
}

impl OrderSummary {
    /// Recompute from scratch; O(n)
    pub fn summarize<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut summary = Self::default();
        for order in orders {
            summary.total += 1;
            match order.status {
                OrderStatus::Pending => summary.pending += 1,
                OrderStatus::Confirmed => summary.confirmed += 1,
                OrderStatus::Shipped => summary.shipped += 1,
                OrderStatus::Delivered => {
                    summary.delivered += 1;
                    summary.total_revenue =
                        summary.total_revenue.saturating_add(order.total_amount);
                }
                OrderStatus::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }
}
