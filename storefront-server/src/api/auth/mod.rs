//! Authentication Routes
//!
//! - /admin/login: public, rate limited per IP
//! - /admin/logout: bearer token required

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::login_rate_limit;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let login = Router::new()
        .route("/admin/login", post(handler::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    Router::new()
        .merge(login)
        .route("/admin/logout", post(handler::logout))
}
