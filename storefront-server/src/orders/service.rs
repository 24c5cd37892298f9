//! Order service: validation, pricing and admin checks around the store

use std::sync::Arc;

use shared::order::lifecycle::parse_target;
use shared::order::{DraftOrder, NewOrder, Order, OrderStatus, OrderSummary, Pricing, validate};
use shared::{AppError, AppResult};

use super::store::{CreateOutcome, OrderStore};
use crate::auth::AdminIdentity;

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    pricing: Pricing,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, pricing: Pricing) -> Self {
        Self { store, pricing }
    }

    /// Customer submission: validate, price, then persist
    ///
    /// A client-supplied `status` is ignored. A client-supplied
    /// `total_amount` must equal the server's quote.
    pub async fn submit(
        &self,
        draft: DraftOrder,
        idempotency_key: Option<String>,
    ) -> AppResult<CreateOutcome> {
        let order = validate(&draft).map_err(|rejection| {
            tracing::info!(
                reason = %rejection.reason,
                field = rejection.field,
                "Order submission rejected"
            );
            AppError::from(rejection)
        })?;

        let quote = self.pricing.quote(&order)?;
        if let Err(e) = quote.verify_submitted(draft.total_amount) {
            tracing::info!(
                expected = quote.total,
                submitted = ?draft.total_amount,
                "Order submission rejected: total mismatch"
            );
            return Err(e);
        }

        let outcome = self
            .store
            .create(NewOrder {
                order,
                total_amount: quote.total,
                idempotency_key,
            })
            .await?;
        Ok(outcome)
    }

    /// All orders newest first, optionally filtered by status
    pub async fn list(&self, admin: &AdminIdentity, status: Option<&str>) -> AppResult<Vec<Order>> {
        admin.require_admin()?;

        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<OrderStatus>()
                    .map_err(|e| AppError::invalid_request(e.to_string()))
            })
            .transpose()?;

        Ok(self.store.list(status).await?)
    }

    pub async fn get(&self, admin: &AdminIdentity, id: i64) -> AppResult<Order> {
        admin.require_admin()?;
        self.store.get(id).await.map_err(|e| {
            tracing::warn!(order_id = id, error = %e, "Order lookup failed");
            e.into()
        })
    }

    /// Move an order to `raw_status`
    ///
    /// A missing order is reported before an unknown target status.
    pub async fn update_status(
        &self,
        admin: &AdminIdentity,
        id: i64,
        raw_status: &str,
    ) -> AppResult<Order> {
        admin.require_admin()?;

        let to = match parse_target(raw_status.trim()) {
            Ok(to) => to,
            Err(e) => {
                self.store.get(id).await?;
                tracing::warn!(order_id = id, status = %raw_status, "Unknown target status");
                return Err(e.into());
            }
        };

        match self.store.update_status(id, to).await {
            Ok(order) => {
                tracing::info!(
                    order_id = id,
                    status = %to,
                    admin = %admin.email,
                    "Order status changed"
                );
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(order_id = id, to = %to, error = %e, "Order status change refused");
                Err(e.into())
            }
        }
    }

    /// Dashboard statistics over every stored order
    pub async fn summary(&self, admin: &AdminIdentity) -> AppResult<OrderSummary> {
        admin.require_admin()?;
        let orders = self.store.list(None).await?;
        Ok(OrderSummary::summarize(&orders))
    }
}
