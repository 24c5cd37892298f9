//! Order Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
};
use shared::client::ListOrdersQuery;
use shared::order::{DraftOrder, Order, OrderSummary, UpdateStatusRequest};
use shared::{AppError, AppResult};

use crate::auth::AdminIdentity;
use crate::core::ServerState;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";
const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

fn idempotency_key(headers: &HeaderMap) -> AppResult<Option<String>> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    let key = value
        .to_str()
        .map_err(|_| AppError::invalid_request("Idempotency-Key must be visible ASCII"))?
        .trim();
    if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(AppError::invalid_request(format!(
            "Idempotency-Key must be 1 to {MAX_IDEMPOTENCY_KEY_LEN} characters"
        )));
    }
    Ok(Some(key.to_string()))
}

fn order_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::invalid_request(format!("Invalid order id: {}", e.body_text())))
}

/// POST /orders - customer submission
///
/// `201` for a new order, `200` for an idempotent replay.
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Result<Json<DraftOrder>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let Json(draft) = body.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let key = idempotency_key(&headers)?;

    let outcome = state.orders.submit(draft, key).await?;
    let status = if outcome.is_replay() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome.into_order())))
}

/// GET /orders
pub async fn list(
    State(state): State<ServerState>,
    admin: AdminIdentity,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Order>>> {
    let Query(query) = query.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let orders = state.orders.list(&admin, query.status.as_deref()).await?;
    Ok(Json(orders))
}

/// GET /orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    admin: AdminIdentity,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Order>> {
    let id = order_id(path)?;
    Ok(Json(state.orders.get(&admin, id).await?))
}

/// PUT /orders/{id}
pub async fn update_status(
    State(state): State<ServerState>,
    admin: AdminIdentity,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<Order>> {
    let id = order_id(path)?;
    let Json(req) = body.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let order = state.orders.update_status(&admin, id, &req.status).await?;
    Ok(Json(order))
}

/// GET /orders/summary
pub async fn summary(
    State(state): State<ServerState>,
    admin: AdminIdentity,
) -> AppResult<Json<OrderSummary>> {
    Ok(Json(state.orders.summary(&admin).await?))
}
