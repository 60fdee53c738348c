use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const USER_EXISTS: &str = "User email already exists, please login instead.";
pub const INTERNAL: &str = "Internal server error";

#[derive(Debug)]
pub enum AppError {
    Sqlx(sqlx::Error),
    PasswordHash(argon2::password_hash::Error),
    Jwt(jsonwebtoken::errors::Error),
    /// Rejected request input. Carries the generic message shown to the caller.
    Invalid(&'static str),
    MissingEmailHeader,
    UserExists,
    NotFound(&'static str),
    IncorrectPassword,
}

impl AppError {
    /// True when a sqlx error is the `users.email` UNIQUE constraint firing.
    pub fn is_unique_violation(e: &sqlx::Error) -> bool {
        e.as_database_error()
            .map(|db_err| db_err.is_unique_violation())
            .unwrap_or(false)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(inner: sqlx::Error) -> Self {
        if AppError::is_unique_violation(&inner) {
            return AppError::UserExists;
        }
        AppError::Sqlx(inner)
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(inner: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(inner)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(inner: jsonwebtoken::errors::Error) -> Self {
        AppError::Jwt(inner)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Sqlx(e) => write!(f, "database error: {}", e),
            AppError::PasswordHash(e) => write!(f, "password hashing error: {}", e),
            AppError::Jwt(e) => write!(f, "token error: {}", e),
            AppError::Invalid(msg) | AppError::NotFound(msg) => f.write_str(msg),
            AppError::MissingEmailHeader => f.write_str("Email not in the request headers"),
            AppError::UserExists => f.write_str(USER_EXISTS),
            AppError::IncorrectPassword => f.write_str("Incorrect password"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Sqlx(_) | AppError::PasswordHash(_) | AppError::Jwt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Invalid(_) | AppError::MissingEmailHeader => StatusCode::BAD_REQUEST,
            // Duplicate registration is reported with a success status and an error body.
            AppError::UserExists => StatusCode::OK,
            // Unknown user and wrong password share 404.
            AppError::NotFound(_) | AppError::IncorrectPassword => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Sqlx(_) | AppError::PasswordHash(_) | AppError::Jwt(_) => {
                tracing::error!("{}", self);
                INTERNAL.to_string()
            }
            AppError::UserExists => {
                tracing::info!("Registration rejected, email already in use");
                self.to_string()
            }
            _ => {
                tracing::error!("{}", self);
                self.to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
