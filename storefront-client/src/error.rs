//! Client error types and their classification for the UI

use shared::error::ErrorCategory;
use shared::order::{RejectReason, Rejection};
use shared::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Caught by local validation; nothing was sent
    #[error("order rejected: {0}")]
    Rejected(Rejection),

    /// The server answered with an error envelope
    #[error("API error ({status}): {error}")]
    Api { status: u16, error: AppError },

    /// Transport failure: connect, timeout, broken body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An admin call was attempted without a token
    #[error("not logged in")]
    NotLoggedIn,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// What the UI should do with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Show the reason next to the field
    Validation(RejectReason),
    /// Discard the token and return to login
    Auth,
    /// Show "try again"; nothing is retried automatically
    Retry,
    /// Generic failure message
    Generic,
}

impl ClientError {
    pub fn classify(&self) -> Failure {
        match self {
            ClientError::Rejected(rejection) => Failure::Validation(rejection.reason),
            ClientError::NotLoggedIn => Failure::Auth,
            ClientError::Http(_) => Failure::Retry,
            ClientError::InvalidResponse(_) => Failure::Generic,
            ClientError::Api { error, .. } => {
                if let Some(reason) = RejectReason::from_error_code(error.code) {
                    Failure::Validation(reason)
                } else if error.code.category() == ErrorCategory::Auth {
                    Failure::Auth
                } else if error.code.is_transient() {
                    Failure::Retry
                } else {
                    Failure::Generic
                }
            }
        }
    }

    /// Server-side error code, if the server answered
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { error, .. } => Some(error.code),
            _ => None,
        }
    }
}

impl From<Rejection> for ClientError {
    fn from(rejection: Rejection) -> Self {
        ClientError::Rejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: ErrorCode) -> ClientError {
        let error = AppError::new(code);
        ClientError::Api {
            status: error.http_status().as_u16(),
            error,
        }
    }

    #[test]
    fn test_classify_by_code() {
        assert_eq!(
            api(ErrorCode::OrderInvalidPhone).classify(),
            Failure::Validation(RejectReason::InvalidPhone)
        );
        assert_eq!(
            api(ErrorCode::OrderTotalMismatch).classify(),
            Failure::Validation(RejectReason::TotalMismatch)
        );
        assert_eq!(api(ErrorCode::TokenExpired).classify(), Failure::Auth);
        assert_eq!(api(ErrorCode::InvalidCredentials).classify(), Failure::Auth);
        assert_eq!(api(ErrorCode::StoreUnavailable).classify(), Failure::Retry);
        assert_eq!(api(ErrorCode::TooManyRequests).classify(), Failure::Retry);
        assert_eq!(api(ErrorCode::OrderNotFound).classify(), Failure::Generic);
        assert_eq!(api(ErrorCode::OrderInvalidTransition).classify(), Failure::Generic);
    }

    #[test]
    fn test_local_failures() {
        assert_eq!(ClientError::NotLoggedIn.classify(), Failure::Auth);
        assert_eq!(
            ClientError::InvalidResponse("x".into()).classify(),
            Failure::Generic
        );
    }
}
