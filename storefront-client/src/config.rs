//! Client configuration

/// Where the API lives and which session to present
///
/// Passed explicitly to every call; the client never reads ambient state.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Admin bearer token, set after login
    pub token: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Drop the bearer token (logout, or after an auth failure)
    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
