//! Auth gate: admin login, per-request token verification, logout

use std::collections::HashMap;
use std::time::Duration;

use shared::AppError;
use shared::client::TokenResponse;
use shared::util::now_secs;
use thiserror::Error;

use super::jwt::{Claims, JwtError, JwtService};
use super::password::{hash_password, verify_password};
use super::revocation::RevocationList;
use crate::security_log;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("token revoked")]
    Revoked,

    #[error("role {0} may not access orders")]
    Forbidden(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::invalid_credentials(),
            AuthError::MissingToken => AppError::not_authenticated(),
            AuthError::MalformedHeader => {
                AppError::invalid_token("Invalid authorization header")
            }
            AuthError::Jwt(JwtError::ExpiredToken) => AppError::token_expired(),
            AuthError::Jwt(JwtError::GenerationFailed(e)) => {
                AppError::internal(format!("Token generation failed: {e}"))
            }
            AuthError::Jwt(_) => AppError::invalid_token("Invalid token"),
            AuthError::Revoked => AppError::token_revoked(),
            AuthError::Forbidden(_) => AppError::admin_required(),
            AuthError::Hashing(e) => AppError::internal(format!("Password check failed: {e}")),
        }
    }
}

/// An entry of the admin identity set
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: String,
}

impl AdminAccount {
    pub fn admin(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}

/// Verified session identity, produced only by [`AuthGate::verify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
    pub role: String,
    pub jti: String,
    /// Unix seconds
    pub expires_at: i64,
}

impl From<Claims> for AdminIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            role: claims.role,
            jti: claims.jti,
            expires_at: claims.exp,
        }
    }
}

impl AdminIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Forbidden unless the session carries the admin role
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            security_log!(
                "WARN",
                "permission_denied",
                email = self.email.clone(),
                role = self.role.clone()
            );
            Err(AuthError::Forbidden(self.role.clone()))
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AuthGate {
    jwt: JwtService,
    /// normalized email -> account
    admins: HashMap<String, AdminAccount>,
    revoked: RevocationList,
    login_delay: Duration,
    /// Verified against when the email is unknown
    dummy_hash: String,
}

impl AuthGate {
    pub fn new(
        jwt: JwtService,
        admins: Vec<AdminAccount>,
        login_delay: Duration,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hash_password(&uuid::Uuid::new_v4().to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let admins = admins
            .into_iter()
            .map(|account| (normalize_email(&account.email), account))
            .collect();

        Ok(Self {
            jwt,
            admins,
            revoked: RevocationList::new(),
            login_delay,
            dummy_hash,
        })
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Check credentials and issue a session token
    ///
    /// Every attempt takes at least `login_delay`, and unknown emails still
    /// pay for a hash verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let account = self.admins.get(&normalize_email(email));
        let hash = account
            .map(|a| a.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let candidate = password.to_string();

        let verify = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash));
        let (verified, _) = tokio::join!(verify, tokio::time::sleep(self.login_delay));
        let verified = verified.map_err(|e| AuthError::Hashing(e.to_string()))?;

        let account = match account {
            Some(account) if verified => account,
            _ => {
                security_log!("WARN", "login_failed", email = email.to_string());
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let issued = self.jwt.generate_token(&account.email, &account.role)?;
        tracing::info!(email = %account.email, jti = %issued.claims.jti, "Admin logged in");

        Ok(TokenResponse::bearer(issued.token, self.jwt.expires_in()))
    }

    /// Validate a bearer token; invalid, expired and revoked tokens all fail
    pub fn verify(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        let claims = self.jwt.validate_token(token)?;
        if self.revoked.is_revoked(&claims.jti) {
            security_log!(
                "WARN",
                "token_revoked",
                jti = claims.jti.clone(),
                email = claims.sub.clone()
            );
            return Err(AuthError::Revoked);
        }
        Ok(AdminIdentity::from(claims))
    }

    /// Verify the raw `Authorization` header value of a request
    pub fn verify_header(&self, header: Option<&str>) -> Result<AdminIdentity, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = JwtService::extract_from_header(header).ok_or(AuthError::MalformedHeader)?;
        self.verify(token)
    }

    /// Revoke the session's token; returns `false` if it was already revoked
    pub fn logout(&self, identity: &AdminIdentity) -> bool {
        let revoked = self.revoked.revoke(&identity.jti, identity.expires_at);
        tracing::info!(email = %identity.email, jti = %identity.jti, "Admin logged out");
        revoked
    }

    /// Forget revocations whose token has expired anyway
    pub fn prune_revoked(&self) -> usize {
        self.revoked.prune(now_secs())
    }
}
