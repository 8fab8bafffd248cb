//! In-process harness: the full router over a `MemoryStore`, driven with `oneshot`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use scribe_api::app::{build_router, build_state};
use scribe_api::config::Config;
use scribe_api::repos::{MemoryStore, Store};
use scribe_api::state::AppState;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const PASSWORD: &str = "correct horse battery";

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("AUTH_TOKEN_SECRET", SECRET),
        ("ACCESS_TOKEN_TTL_SECONDS", "900"),
        ("SQIDS_MIN_LENGTH", "8"),
        // keep hashing cheap in tests
        ("ARGON2_MEMORY_KIB", "64"),
        ("ARGON2_ITERATIONS", "1"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        if self.bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.bytes).expect("json body")
        }
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<dyn Store>,
}

/// A signed-in principal.
pub struct Account {
    pub id: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = build_state(&config, store.clone()).expect("state");
        let router = build_router(state.clone(), &config);
        Self {
            router,
            state,
            store,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.expect("infallible");
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(req).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.call(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.call(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.call(Method::DELETE, path, token, None).await
    }

    pub async fn register(&self, identifier: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/register",
            None,
            json!({
                "identifier": identifier,
                "display_name": identifier.to_uppercase(),
                "secret": PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&self, identifier: &str, secret: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/login",
            None,
            json!({ "identifier": identifier, "secret": secret }),
        )
        .await
    }

    /// Registers and logs in.
    pub async fn sign_up(&self, identifier: &str) -> Account {
        let registered = self.register(identifier).await;
        assert_eq!(registered.status, StatusCode::CREATED, "register {identifier}");

        let logged_in = self.login(identifier, PASSWORD).await;
        assert_eq!(logged_in.status, StatusCode::OK, "login {identifier}");

        let body = logged_in.json();
        Account {
            id: body["principal"]["id"].as_str().expect("id").to_string(),
            token: body["token"].as_str().expect("token").to_string(),
        }
    }

    /// Creates a resource and returns its public id.
    pub async fn create(&self, collection: &str, owner: &Account, body: Value) -> String {
        let res = self
            .post(&format!("/api/v1/{collection}"), Some(&owner.token), body)
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "create {collection}");
        res.json()["id"].as_str().expect("public id").to_string()
    }
}
