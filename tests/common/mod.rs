//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use quick_save::auth::TokenService;
use quick_save::store::{MemoryStore, UserRepository};
use quick_save::{create_router, db, AppState, User};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Setup test database - check the schema and truncate all tables
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let schema_ok = db::check_schema(&pool)
        .await
        .expect("Failed to check schema");
    assert!(schema_ok, "Apply migrations/0001_quick_save.sql before running store tests");

    sqlx::query("TRUNCATE TABLE users, expenses CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}

/// Router wired to an in-memory store
pub struct TestApp {
    pub app: Router,
    pub store: MemoryStore,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let tokens = TokenService::new(TEST_SECRET, 3600);
        let state = AppState::new(Arc::new(store.clone()), tokens.clone());

        Self {
            app: create_router(state),
            store,
            tokens,
        }
    }

    /// Insert a user directly and return it with a valid token
    pub async fn seed_user(&self, name: &str, email: &str) -> (User, String) {
        let user = User::new(
            name.to_string(),
            email.to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$unused$unused".to_string(),
        );
        self.store.insert_user(&user).await.unwrap();
        let token = self.tokens.issue(user.id).unwrap();
        (user, token)
    }

    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}
