//! Authentication Handlers
//!
//! Admin login and logout

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use shared::client::{LoginRequest, LogoutResponse, TokenResponse};
use shared::{AppError, AppResult};

use crate::auth::AdminIdentity;
use crate::core::ServerState;

/// POST /admin/login
///
/// Wrong email and wrong password fail identically, after the same delay.
pub async fn login(
    State(state): State<ServerState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(req) = body.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let token = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(token))
}

/// POST /admin/logout
pub async fn logout(
    State(state): State<ServerState>,
    admin: AdminIdentity,
) -> AppResult<Json<LogoutResponse>> {
    let revoked = state.auth.logout(&admin);
    Ok(Json(LogoutResponse { revoked }))
}
