//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-memory store seeded with the demo tenants
//! - The full router built on top of it
//! - Login and JSON request helpers

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use notevault_api::app::{build_router, AppState};
use notevault_api::config::{ApiConfig, Config, JwtConfig, StoreBackend, StoreConfig};
use notevault_shared::auth::jwt::{StaticSecret, TokenService};
use notevault_shared::provision::seed_demo_data;
use notevault_shared::store::memory::MemoryStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const DEMO_PASSWORD: &str = "password";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".to_string()],
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
            seed_demo_data: true,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// Token service sharing the router's secret, for crafting tokens directly
pub fn test_tokens() -> TokenService {
    TokenService::new(Arc::new(StaticSecret::new(TEST_SECRET)))
}

impl TestContext {
    /// Creates a context with acme and globex provisioned (both free plan)
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_demo_data(store.as_ref()).await.unwrap();

        let app = build_router(AppState::new(store.clone(), test_config()));

        TestContext { store, app }
    }

    /// Sends a request and returns the status and JSON body (Null when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Sends a raw body with an optional content type, bypassing JSON encoding
    pub async fn send_raw(
        &self,
        uri: &str,
        auth: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }

        let request = builder.body(Body::from(body.to_string())).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Sends a request with a bearer token
    pub async fn send_as(
        &self,
        token: &str,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let auth = format!("Bearer {}", token);
        self.send(method, uri, Some(&auth), body).await
    }

    /// Logs in and returns the session token
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": DEMO_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);

        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a note and returns its JSON
    pub async fn create_note(&self, token: &str, title: &str) -> (StatusCode, Value) {
        self.send_as(
            token,
            "POST",
            "/api/notes",
            Some(serde_json::json!({ "title": title, "content": format!("{} body", title) })),
        )
        .await
    }
}
