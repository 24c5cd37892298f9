//! Admin flow: login -> list -> summarize

use shared::client::{HealthResponse, LoginRequest, LogoutResponse, TokenResponse};
use shared::order::{Order, OrderStatus, OrderSummary, UpdateStatusRequest};

use crate::{ApiConfig, ClientError, ClientResult, HttpClient};

/// Orders as loaded by the dashboard, with statistics over exactly that set
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub orders: Vec<Order>,
    pub summary: OrderSummary,
}

fn require_token(config: &ApiConfig) -> ClientResult<()> {
    if config.token.is_some() {
        Ok(())
    } else {
        Err(ClientError::NotLoggedIn)
    }
}

impl HttpClient {
    /// Exchange credentials for a bearer token
    ///
    /// Store the token with [`ApiConfig::with_token`].
    pub async fn login(
        &self,
        config: &ApiConfig,
        email: &str,
        password: &str,
    ) -> ClientResult<TokenResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let (_, token) = self.post(config, "/admin/login", &request, &[]).await?;
        Ok(token)
    }

    /// Revoke the session server-side; drop the token locally afterwards
    pub async fn logout(&self, config: &ApiConfig) -> ClientResult<LogoutResponse> {
        require_token(config)?;
        self.post_empty(config, "/admin/logout").await
    }

    pub async fn list_orders(
        &self,
        config: &ApiConfig,
        status: Option<OrderStatus>,
    ) -> ClientResult<Vec<Order>> {
        require_token(config)?;
        let path = match status {
            Some(status) => format!("/orders?status={}", status.as_str()),
            None => "/orders".to_string(),
        };
        self.get(config, &path).await
    }

    pub async fn get_order(&self, config: &ApiConfig, id: i64) -> ClientResult<Order> {
        require_token(config)?;
        self.get(config, &format!("/orders/{id}")).await
    }

    pub async fn update_status(
        &self,
        config: &ApiConfig,
        id: i64,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        require_token(config)?;
        self.put(config, &format!("/orders/{id}"), &UpdateStatusRequest::new(status))
            .await
    }

    /// Server-side statistics over every order
    pub async fn summary(&self, config: &ApiConfig) -> ClientResult<OrderSummary> {
        require_token(config)?;
        self.get(config, "/orders/summary").await
    }

    /// Load (or refresh) the dashboard: list, then summarize locally
    pub async fn load_dashboard(&self, config: &ApiConfig) -> ClientResult<Dashboard> {
        let orders = self.list_orders(config, None).await?;
        let summary = OrderSummary::summarize(&orders);
        Ok(Dashboard { orders, summary })
    }

    pub async fn health(&self, config: &ApiConfig) -> ClientResult<HealthResponse> {
        self.get(config, "/health").await
    }
}
