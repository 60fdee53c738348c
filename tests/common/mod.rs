#![allow(dead_code)]

use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use giftlink_auth::{config::Config, rest, AppState};
use jsonwebtoken::DecodingKey;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub fn config() -> Config {
    Config::from_lookup(|var| match var {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        // every connection to :memory: is its own database
        "DATABASE_MAX_CONNECTIONS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap()
}

fn cheap_argon2() -> Argon2<'static> {
    Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(8, 1, 1, None).unwrap(),
    )
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = config();
        let pool = giftlink_auth::connect(&config).await.unwrap();
        let state = AppState::new(pool.clone(), &config).with_argon2(cheap_argon2());
        TestApp {
            router: rest::router(state),
            pool,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, body)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/register",
            serde_json::json!({
                "email": email,
                "firstName": "A",
                "lastName": "B",
                "password": password,
            }),
        )
        .await
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn user_id(&self, email: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// The record id embedded in an auth token.
pub fn token_user_id(token: &str) -> String {
    giftlink_auth::token::verify(token, &DecodingKey::from_secret(SECRET.as_bytes()))
        .unwrap()
        .user
        .id
}
