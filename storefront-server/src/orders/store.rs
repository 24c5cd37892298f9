//! Order store: the persistence boundary for orders
//!
//! The store validates nothing about the customer's input; callers hand it a
//! [`NewOrder`] that already passed validation and pricing. It owns id and
//! timestamp assignment, the initial status, idempotent replays, and the
//! compare-and-set status update.

use async_trait::async_trait;
use shared::AppError;
use shared::order::lifecycle::{self, TransitionError};
use shared::order::{NewOrder, Order, OrderStatus, ValidatedOrder};
use sha2::{Digest, Sha256};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::time::Duration;
use thiserror::Error;

/// SQLITE_BUSY_SNAPSHOT: a read transaction tried to write after another writer committed
const SQLITE_BUSY_SNAPSHOT: &str = "517";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("order {0} was modified concurrently")]
    Conflict(i64),

    /// The key already belongs to a submission with different contents
    #[error("idempotency key reused for a different submission")]
    KeyReused,

    #[error("order store unavailable: {0}")]
    Unavailable(String),

    #[error("stored order {id} is unreadable: {reason}")]
    Corrupt { id: i64, reason: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::order_not_found(id),
            StoreError::Transition(e) => e.into(),
            StoreError::Conflict(id) => {
                AppError::new(shared::ErrorCode::OrderConflict).with_detail("id", id)
            }
            StoreError::KeyReused => AppError::new(shared::ErrorCode::IdempotencyKeyReused),
            StoreError::Unavailable(detail) => {
                tracing::error!(error = %detail, "Order store unavailable");
                AppError::store_unavailable()
            }
            StoreError::Corrupt { id, reason } => {
                tracing::error!(order_id = id, reason = %reason, "Unreadable order row");
                AppError::internal("Stored order could not be read")
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a create: a new order, or the original one for a replayed key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Order),
    Replayed(Order),
}

impl CreateOutcome {
    pub fn order(&self) -> &Order {
        match self {
            CreateOutcome::Created(order) | CreateOutcome::Replayed(order) => order,
        }
    }

    pub fn into_order(self) -> Order {
        match self {
            CreateOutcome::Created(order) | CreateOutcome::Replayed(order) => order,
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self, CreateOutcome::Replayed(_))
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order with `status = pending`
    async fn create(&self, new_order: NewOrder) -> StoreResult<CreateOutcome>;

    /// All orders, newest first (ties broken by id, descending)
    async fn list(&self, status: Option<OrderStatus>) -> StoreResult<Vec<Order>>;

    async fn get(&self, id: i64) -> StoreResult<Order>;

    /// Move an order along the lifecycle
    async fn update_status(&self, id: i64, to: OrderStatus) -> StoreResult<Order>;
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    phone: String,
    address: String,
    quantity: i64,
    color: String,
    payment_method: String,
    total_amount: i64,
    status: String,
    created_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt { id: row.id, reason };

        Ok(Order {
            id: row.id,
            quantity: u32::try_from(row.quantity)
                .map_err(|_| corrupt(format!("quantity {}", row.quantity)))?,
            color: row.color.parse().map_err(|e| corrupt(format!("{e}")))?,
            payment_method: row.payment_method.parse().map_err(|e| corrupt(format!("{e}")))?,
            status: row.status.parse().map_err(|e| corrupt(format!("{e}")))?,
            total_amount: row.total_amount,
            created_at: row.created_at,
            customer_name: row.customer_name,
            phone: row.phone,
            address: row.address,
        })
    }
}

const ORDER_COLUMNS: &str = "id, customer_name, phone, address, quantity, color, \
                             payment_method, total_amount, status, created_at";

/// An order that holds an idempotency key, with the digest of its submission
#[derive(sqlx::FromRow)]
struct KeyedRow {
    #[sqlx(flatten)]
    order: OrderRow,
    idempotency_fingerprint: Option<String>,
}

/// SHA-256 over the validated submission and its total, hex encoded
fn fingerprint(order: &ValidatedOrder, total_amount: i64) -> String {
    let quantity = order.quantity.to_string();
    let total = total_amount.to_string();
    let fields = [
        order.customer_name.as_str(),
        order.phone.as_str(),
        order.address.as_str(),
        quantity.as_str(),
        order.color.as_str(),
        order.payment_method.as_str(),
        total.as_str(),
    ];

    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(field.as_bytes());
        // Unit separator keeps field boundaries unambiguous
        hasher.update([0x1f]);
    }
    format!("{:x}", hasher.finalize())
}

/// Replay the order holding a key, but only for the same submission
fn replay(row: KeyedRow, expected: &str) -> StoreResult<CreateOutcome> {
    if row.idempotency_fingerprint.as_deref() != Some(expected) {
        tracing::warn!(
            order_id = row.order.id,
            "Idempotency key reused for a different submission"
        );
        return Err(StoreError::KeyReused);
    }
    let order = Order::try_from(row.order)?;
    tracing::info!(order_id = order.id, "Idempotent replay of order submission");
    Ok(CreateOutcome::Replayed(order))
}

fn is_busy_snapshot(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == SQLITE_BUSY_SNAPSHOT)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

/// SQLite-backed order store
#[derive(Clone, Debug)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
    /// How long an idempotency key keeps collapsing retries
    idempotency_window: Duration,
}

impl SqliteOrderStore {
    pub fn new(pool: SqlitePool, idempotency_window: Duration) -> Self {
        Self {
            pool,
            idempotency_window,
        }
    }

    async fn find_by_key(&self, key: &str) -> StoreResult<Option<KeyedRow>> {
        let row = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS}, idempotency_fingerprint FROM orders \
             WHERE idempotency_key = ?"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn create(&self, new_order: NewOrder) -> StoreResult<CreateOutcome> {
        let NewOrder {
            order,
            total_amount,
            idempotency_key,
        } = new_order;
        let now = now_millis();
        let digest = idempotency_key
            .as_ref()
            .map(|_| fingerprint(&order, total_amount));

        let mut tx = self.pool.begin().await?;

        if let (Some(key), Some(digest)) = (idempotency_key.as_deref(), digest.as_deref()) {
            // Release the key if its window has passed; this write also takes the lock
            let cutoff = now - self.idempotency_window.as_millis() as i64;
            sqlx::query(
                "UPDATE orders SET idempotency_key = NULL, idempotency_fingerprint = NULL \
                 WHERE idempotency_key = ? AND created_at < ?",
            )
            .bind(key)
            .bind(cutoff)
            .execute(&mut *tx)
            .await?;

            let existing: Option<KeyedRow> = sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS}, idempotency_fingerprint FROM orders \
                 WHERE idempotency_key = ?"
            ))
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = existing {
                tx.commit().await?;
                return replay(row, digest);
            }
        }

        let inserted = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders \
             (customer_name, phone, address, quantity, color, payment_method, \
              total_amount, status, created_at, idempotency_key, idempotency_fingerprint) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&order.customer_name)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(i64::from(order.quantity))
        .bind(order.color.as_str())
        .bind(order.payment_method.as_str())
        .bind(total_amount)
        .bind(OrderStatus::Pending.as_str())
        .bind(now)
        .bind(idempotency_key.as_deref())
        .bind(digest.as_deref())
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) if is_unique_violation(&e) => {
                // Lost a race on the same key; the winner's order is the answer
                drop(tx);
                let key = idempotency_key.as_deref().unwrap_or_default();
                return match self.find_by_key(key).await? {
                    Some(row) => replay(row, digest.as_deref().unwrap_or_default()),
                    None => Err(StoreError::Unavailable(e.to_string())),
                };
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        let order = Order::try_from(row)?;
        tracing::info!(
            order_id = order.id,
            quantity = order.quantity,
            total_amount = order.total_amount,
            "Order created"
        );
        Ok(CreateOutcome::Created(order))
    }

    async fn list(&self, status: Option<OrderStatus>) -> StoreResult<Vec<Order>> {
        let rows: Vec<OrderRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE status = ? \
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn get(&self, id: i64) -> StoreResult<Order> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Order::try_from)
            .transpose()?
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_status(&self, id: i64, to: OrderStatus) -> StoreResult<Order> {
        // A writer committing between our read and write surfaces as BUSY_SNAPSHOT
        let lift = |e: sqlx::Error| {
            if is_busy_snapshot(&e) {
                StoreError::Conflict(id)
            } else {
                StoreError::from(e)
            }
        };

        let mut tx = self.pool.begin().await?;

        let current: Option<(String,)> = sqlx::query_as("SELECT status FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(lift)?;
        let (current,) = current.ok_or(StoreError::NotFound(id))?;
        let from: OrderStatus = current.parse().map_err(|e| StoreError::Corrupt {
            id,
            reason: format!("{e}"),
        })?;

        lifecycle::transition(from, to)?;

        // Compare-and-set on the status read above
        let updated: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = ? WHERE id = ? AND status = ? \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(to.as_str())
        .bind(id)
        .bind(from.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(lift)?;

        let row = updated.ok_or(StoreError::Conflict(id))?;
        tx.commit().await.map_err(lift)?;

        tracing::info!(order_id = id, from = %from, to = %to, "Order status updated");
        Order::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::order::{PaymentMethod, ValidatedOrder, Variant};

    async fn store_with_window(window: Duration) -> (tempfile::TempDir, SqliteOrderStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("orders.db").display());
        let db = DbService::new(&url).await.unwrap();
        (dir, SqliteOrderStore::new(db.pool, window))
    }

    async fn store() -> (tempfile::TempDir, SqliteOrderStore) {
        store_with_window(Duration::from_secs(600)).await
    }

    fn new_order(name: &str, key: Option<&str>) -> NewOrder {
        NewOrder {
            order: ValidatedOrder {
                customer_name: name.into(),
                phone: "01712345678".into(),
                address: "House 1, Dhaka".into(),
                quantity: 2,
                color: Variant::Gray,
                payment_method: PaymentMethod::MobileWallet,
            },
            total_amount: 2598,
            idempotency_key: key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_status_and_timestamp() {
        let (_dir, store) = store().await;
        let before = now_millis();

        let order = store.create(new_order("Rahim", None)).await.unwrap().into_order();
        assert!(order.id > 0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.created_at >= before);
        assert_eq!(order.total_amount, 2598);
        assert_eq!(order.color, Variant::Gray);

        assert_eq!(store.get(order.id).await.unwrap(), order);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_id_tiebreak() {
        let (_dir, store) = store().await;
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(store.create(new_order(name, None)).await.unwrap().into_order().id);
        }

        // Force identical timestamps so only the id breaks the tie
        sqlx::query("UPDATE orders SET created_at = 1000")
            .execute(&store.pool)
            .await
            .unwrap();

        let listed: Vec<i64> = store.list(None).await.unwrap().iter().map(|o| o.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (_dir, store) = store().await;
        let a = store.create(new_order("a", None)).await.unwrap().into_order();
        store.create(new_order("b", None)).await.unwrap();
        store.update_status(a.id, OrderStatus::Confirmed).await.unwrap();

        let confirmed = store.list(Some(OrderStatus::Confirmed)).await.unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, a.id);
        assert_eq!(store.list(Some(OrderStatus::Pending)).await.unwrap().len(), 1);
        assert!(store.list(Some(OrderStatus::Delivered)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, store) = store().await;
        assert!(matches!(store.get(999).await, Err(StoreError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_update_status_follows_lifecycle() {
        let (_dir, store) = store().await;
        let order = store.create(new_order("a", None)).await.unwrap().into_order();

        for next in [OrderStatus::Confirmed, OrderStatus::Shipped, OrderStatus::Delivered] {
            let updated = store.update_status(order.id, next).await.unwrap();
            assert_eq!(updated.status, next);
            assert_eq!(updated.total_amount, order.total_amount);
        }

        let err = store
            .update_status(order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Transition(TransitionError::NotAllowed {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending
            })
        ));
        assert_eq!(store.get(order.id).await.unwrap().status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_update_status_same_status_rejected() {
        let (_dir, store) = store().await;
        let order = store.create(new_order("a", None)).await.unwrap().into_order();
        assert!(matches!(
            store.update_status(order.id, OrderStatus::Pending).await,
            Err(StoreError::Transition(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.update_status(42, OrderStatus::Confirmed).await,
            Err(StoreError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_idempotent_replay_returns_original() {
        let (_dir, store) = store().await;
        let first = store.create(new_order("a", Some("key-1"))).await.unwrap();
        let second = store.create(new_order("a", Some("key-1"))).await.unwrap();

        assert!(!first.is_replay());
        assert!(second.is_replay());
        assert_eq!(first.order().id, second.order().id);
        assert_eq!(store.list(None).await.unwrap().len(), 1);

        let other = store.create(new_order("a", Some("key-2"))).await.unwrap();
        assert!(!other.is_replay());
        assert_ne!(other.order().id, first.order().id);
    }

    #[tokio::test]
    async fn test_key_reused_for_different_submission() {
        let (_dir, store) = store().await;
        store.create(new_order("Rahim", Some("key-1"))).await.unwrap();

        let err = store
            .create(new_order("Mallory", Some("key-1")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::KeyReused));

        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::IdempotencyKeyReused);
        assert!(app.details.is_none());
        assert!(!app.message.contains("Rahim"));
        assert_eq!(store.list(None).await.unwrap().len(), 1);
    }

    #[test]
    fn test_fingerprint_covers_every_field() {
        let base = new_order("Rahim", None);
        let digest = fingerprint(&base.order, base.total_amount);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, fingerprint(&base.order, base.total_amount));

        let mut moved = base.order.clone();
        moved.address = "Somewhere else".into();
        assert_ne!(digest, fingerprint(&moved, base.total_amount));
        assert_ne!(digest, fingerprint(&base.order, base.total_amount + 1));

        // Shifting text across a field boundary changes the digest
        let mut a = base.order.clone();
        a.customer_name = "ab".into();
        a.phone = "c".into();
        let mut b = base.order.clone();
        b.customer_name = "a".into();
        b.phone = "bc".into();
        assert_ne!(fingerprint(&a, 1), fingerprint(&b, 1));
    }

    #[tokio::test]
    async fn test_expired_key_is_released() {
        let (_dir, store) = store_with_window(Duration::from_secs(60)).await;
        let first = store.create(new_order("a", Some("key"))).await.unwrap();

        // Age the first order beyond the window
        sqlx::query("UPDATE orders SET created_at = created_at - 120000")
            .execute(&store.pool)
            .await
            .unwrap();

        let second = store.create(new_order("a", Some("key"))).await.unwrap();
        assert!(!second.is_replay());
        assert_ne!(first.order().id, second.order().id);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let (_dir, store) = store().await;
        let store = std::sync::Arc::new(store);

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(new_order(&format!("customer-{i}"), None))
                        .await
                        .map(CreateOutcome::into_order)
                })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for task in tasks {
            ids.insert(task.await.unwrap().unwrap().id);
        }
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let (_dir, store) = store().await;
        store.pool.close().await;

        let err = store.list(None).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::StoreUnavailable);
        assert!(!app.message.contains("pool"));
    }
}
