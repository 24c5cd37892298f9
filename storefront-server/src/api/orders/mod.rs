//! Order Routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /orders | POST | none |
//! | /orders | GET | admin |
//! | /orders/summary | GET | admin |
//! | /orders/{id} | GET | admin |
//! | /orders/{id} | PUT | admin |

mod handler;

pub use handler::IDEMPOTENCY_KEY_HEADER;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list).post(handler::create))
        .route("/orders/summary", get(handler::summary))
        .route(
            "/orders/{id}",
            get(handler::get_by_id).put(handler::update_status),
        )
}
