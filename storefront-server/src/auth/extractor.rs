//! Admin session extractor
//!
//! Handlers that take an [`AdminIdentity`] argument are protected: the
//! bearer token is verified before the handler body runs.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::AppError;

use crate::auth::{AdminIdentity, AuthError};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for AdminIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<AdminIdentity>() {
            return Ok(identity.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match state.auth.verify_header(auth_header) {
            Ok(identity) => {
                parts.extensions.insert(identity.clone());
                Ok(identity)
            }
            Err(AuthError::MissingToken) => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                Err(AuthError::MissingToken.into())
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );
                Err(e.into())
            }
        }
    }
}
