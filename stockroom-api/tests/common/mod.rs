/// Common test utilities for integration tests
///
/// Tests run against a real PostgreSQL database named by `DATABASE_URL`.
/// When the variable is unset the tests skip themselves, so the unit suite
/// stays runnable without infrastructure. Fixtures use unique usernames so
/// tests can share one database and run in parallel.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};
use stockroom_api::app::{build_router, AppState};
use stockroom_api::config::Config;
use tower::Service as _;

/// Test context: the database pool plus a ready-to-call router
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context, or `None` when no database is configured
    pub async fn new() -> Option<Self> {
        let config = match Config::from_env() {
            Ok(config) => config,
            Err(_) => {
                eprintln!("DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        let db = PgPool::connect(&config.database.url)
            .await
            .expect("failed to connect to test database");

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("failed to run migrations");

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Some(TestContext { db, app })
    }

    /// Sends a request and returns the status plus the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
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

    /// Registers a fresh account through the API and returns its response
    /// body (`token` + `user`)
    pub async fn register_user(&self, username: &str, role: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "password123",
                    "role": role,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body
    }

    /// Creates a task through the API and returns its body
    pub async fn create_task(&self, created_by: &str, assigned_to: &str, body: Value) -> Value {
        let uri = format!(
            "/api/tasks?createdBy={}&assignedTo={}",
            created_by, assigned_to
        );
        let (status, task) = self.request("POST", &uri, Some(body)).await;

        assert_eq!(status, StatusCode::OK, "create task failed: {}", task);
        task
    }
}

/// Appends a nanosecond suffix so parallel tests never collide on the
/// unique username/email columns
pub fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}
