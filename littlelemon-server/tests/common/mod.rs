//! Shared helpers for the integration tests
//!
//! Each test gets its own in-memory database and drives the full
//! application (middleware included) through `oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use littlelemon_server::auth::{JwtConfig, password};
use littlelemon_server::db::DbService;
use littlelemon_server::db::repository::user::{self, NewAccount};
use littlelemon_server::{App, Config, ServerState, build_app};
use shared::models::User;

pub const PASSWORD: &str = "lemon-pass-2024";

pub struct TestApp {
    pub app: App,
    pub state: ServerState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn test_config() -> Config {
    let mut config = Config::new(JwtConfig::with_secret(
        "integration-test-secret-with-enough-bytes",
    ));
    config.login_delay_ms = 0;
    config
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_page_size(size: u32) -> Self {
        let mut config = test_config();
        config.page_size = Some(size);
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::new(config, db).unwrap();
        let app = build_app(state.clone());
        Self { app, state }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// JSON request, optionally authenticated with `Authorization: Token`
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "testserver");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        self.send(request.unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.call(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Account with [`PASSWORD`] created directly in the database
    pub async fn create_account(&self, username: &str, is_staff: bool) -> User {
        let hash = password::hash_password(PASSWORD).unwrap();
        user::create_account(
            self.state.pool(),
            NewAccount {
                username,
                email: &format!("{username}@littlelemon.test"),
                password_hash: &hash,
                is_staff,
            },
        )
        .await
        .unwrap()
    }

    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post(
                "/auth/token/login/",
                None,
                serde_json::json!({"username": username, "password": PASSWORD}),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["auth_token"].as_str().unwrap().to_string()
    }

    /// Token of a freshly created account
    pub async fn token_for(&self, username: &str, is_staff: bool) -> String {
        self.create_account(username, is_staff).await;
        self.login(username).await
    }
}
