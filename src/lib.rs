pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod rest;
pub mod token;
pub mod validation;

use argon2::Argon2;
use jsonwebtoken::EncodingKey;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub encoding_key: EncodingKey,
    pub argon2: Argon2<'static>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        AppState {
            db,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            argon2: Argon2::default(),
        }
    }

    /// Swap the hashing parameters, e.g. for cheaper hashing in tests.
    pub fn with_argon2(mut self, argon2: Argon2<'static>) -> Self {
        self.argon2 = argon2;
        self
    }
}

/// Open the pool and bring the schema up to date.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
