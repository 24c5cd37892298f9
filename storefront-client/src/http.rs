//! HTTP transport for the storefront API

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{ApiResponse, AppError, ErrorCode};
use std::time::Duration;

use crate::{ApiConfig, ClientError, ClientResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper over a pooled `reqwest` client
///
/// Holds no endpoint or session; every call takes an [`ApiConfig`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> ClientResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn authorize(request: RequestBuilder, config: &ApiConfig) -> RequestBuilder {
        match config.auth_header() {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        config: &ApiConfig,
        path: &str,
    ) -> ClientResult<T> {
        let request = Self::authorize(self.client.get(config.url(path)), config);
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request with a JSON body and extra headers
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        config: &ApiConfig,
        path: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> ClientResult<(u16, T)> {
        let mut request = Self::authorize(self.client.post(config.url(path)).json(body), config);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        Ok((status, Self::handle_response(response).await?))
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        config: &ApiConfig,
        path: &str,
    ) -> ClientResult<T> {
        let request = Self::authorize(self.client.post(config.url(path)), config);
        Self::handle_response(request.send().await?).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        config: &ApiConfig,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = Self::authorize(self.client.put(config.url(path)).json(body), config);
        Self::handle_response(request.send().await?).await
    }

    /// Decode a success body, or turn the error envelope back into an [`AppError`]
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let error = serde_json::from_str::<ApiResponse>(&text)
                .map(ApiResponse::into_app_error)
                .unwrap_or_else(|_| fallback_error(status.as_u16(), text));
            tracing::debug!(status = status.as_u16(), code = %error.code, "API call failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                error,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Error for a non-envelope body (proxy pages, empty bodies)
fn fallback_error(status: u16, body: String) -> AppError {
    let code = match status {
        401 => ErrorCode::NotAuthenticated,
        403 => ErrorCode::AdminRequired,
        404 => ErrorCode::NotFound,
        429 => ErrorCode::TooManyRequests,
        502..=504 => ErrorCode::StoreUnavailable,
        400..=499 => ErrorCode::InvalidRequest,
        _ => ErrorCode::InternalError,
    };
    let error = AppError::new(code);
    if body.is_empty() {
        error
    } else {
        error.with_detail("body", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_error_codes() {
        assert_eq!(fallback_error(401, String::new()).code, ErrorCode::NotAuthenticated);
        assert_eq!(fallback_error(503, String::new()).code, ErrorCode::StoreUnavailable);
        assert_eq!(fallback_error(418, String::new()).code, ErrorCode::InvalidRequest);
        assert_eq!(fallback_error(500, "boom".into()).detail_str("body"), Some("boom"));
    }
}
