use std::sync::Arc;
use std::time::Duration;

use shared::order::Pricing;

use crate::auth::password::hash_password;
use crate::auth::{AdminAccount, AuthError, AuthGate, JwtService, RateLimiter};
use crate::core::config::AdminPassword;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::{OrderService, SqliteOrderStore};

/// Housekeeping interval for the rate limiter and revocation list
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(300);

/// Server state: shared handles to every service
///
/// Cloning is cheap; every field is a pool handle or an `Arc`.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable settings |
/// | db | SQLite pool |
/// | orders | validation, pricing and the order store |
/// | auth | admin login, token verification, revocation |
/// | rate_limiter | per-IP login throttle |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub orders: Arc<OrderService>,
    pub auth: Arc<AuthGate>,
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    /// Open the database, build services, load the admin identity set
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;

        let store = SqliteOrderStore::new(db.pool.clone(), config.idempotency_window);
        let pricing = Pricing::flat(config.unit_price, config.delivery_fee);
        let orders = Arc::new(OrderService::new(Arc::new(store), pricing));

        let password_hash = match &config.admin_password {
            AdminPassword::Hash(hash) => hash.clone(),
            AdminPassword::Plain(password) => {
                hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))?
            }
        };
        let auth = Arc::new(AuthGate::new(
            JwtService::with_config(config.jwt.clone()),
            vec![AdminAccount::admin(&config.admin_email, password_hash)],
            config.login_delay,
        )?);

        tracing::info!(
            admin = %config.admin_email,
            unit_price = config.unit_price,
            delivery_fee = config.delivery_fee,
            environment = %config.environment,
            "Server state initialized"
        );

        Ok(Self {
            config: config.clone(),
            db,
            orders,
            auth,
            rate_limiter: RateLimiter::new(),
        })
    }

    /// Start periodic housekeeping; the caller shuts the returned tasks down
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        let auth = self.auth.clone();
        let limiter = self.rate_limiter.clone();

        tasks.spawn("housekeeping", async move {
            let mut interval = tokio::time::interval(HOUSEKEEPING_INTERVAL);
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let idle = limiter.cleanup().await;
                        let pruned = auth.prune_revoked();
                        tracing::debug!(idle, pruned, "Housekeeping pass");
                    }
                }
            }
        });

        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_hashes_plain_admin_password() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("orders.db").display());
        let mut config = Config::development(url);
        config.login_delay = Duration::ZERO;

        let state = ServerState::initialize(&config).await.unwrap();
        assert!(state.db.ping().await);
        assert!(state.auth.login("admin@example.com", "password").await.is_ok());
        assert!(state.auth.login("admin@example.com", "wrong").await.is_err());

        state.start_background_tasks().shutdown().await;
    }
}
