//! Shared fixtures for the HTTP-level tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::time::Duration;
use storefront_server::api::build_app;
use storefront_server::{Config, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password";

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
    _dir: TempDir,
}

/// Development config over a fresh database, without the login delay
pub fn test_config(dir: &TempDir) -> Config {
    let url = format!("sqlite:{}", dir.path().join("orders.db").display());
    let mut config = Config::development(url);
    config.login_delay = Duration::ZERO;
    config
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        tweak(&mut config);

        let state = ServerState::initialize(&config).await.unwrap();
        let router = build_app(state.clone());
        Self {
            state,
            router,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn post_order(&self, body: Value, key: Option<&str>) -> (StatusCode, Value) {
        let mut builder =
            Request::post("/orders").header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = key {
            builder = builder.header("idempotency-key", key);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.login_from(email, password, None).await
    }

    /// Login with an `X-Forwarded-For` header
    pub async fn login_from(
        &self,
        email: &str,
        password: &str,
        forwarded_for: Option<&str>,
    ) -> (StatusCode, Value) {
        let body = json!({ "email": email, "password": password });
        let mut builder =
            Request::post("/admin/login").header(header::CONTENT_TYPE, "application/json");
        if let Some(ip) = forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn put_status(&self, id: i64, status: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::put(format!("/orders/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": status }).to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn valid_order() -> Value {
    json!({
        "customer_name": "Rahim Uddin",
        "phone": "01712345678",
        "address": "House 12, Road 5, Dhanmondi, Dhaka",
        "quantity": 2,
        "color": "blue",
        "payment_method": "cash_on_delivery",
        "total_amount": 2598,
        "status": "pending"
    })
}
