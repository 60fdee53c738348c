use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::user::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateRequest,
        UpdateResponse, User,
    },
    password, token,
    validation::Validator,
    AppState,
};

const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 32;

fn body<T>(payload: Result<Json<T>, JsonRejection>, message: &'static str) -> Result<T, AppError> {
    payload.map(|Json(req)| req).map_err(|e| {
        tracing::warn!("Rejected request body: {}", e.body_text());
        AppError::Invalid(message)
    })
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.db)
        .await?;
    Ok(user)
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    const INVALID: &str = "Invalid field values";
    let req = body(payload, INVALID)?;

    if let Err(violations) = Validator::new()
        .required("email", req.email.as_deref())
        .email("email", req.email.as_deref())
        .required("firstName", req.first_name.as_deref())
        .required("lastName", req.last_name.as_deref())
        .required("password", req.password.as_deref())
        .length("password", req.password.as_deref(), PASSWORD_MIN, PASSWORD_MAX)
        .finish()
    {
        tracing::warn!(fields = ?violations.fields(), "Registration validation failed: {}", violations);
        return Err(AppError::Invalid(INVALID));
    }

    let (Some(email), Some(first_name), Some(last_name), Some(plaintext)) =
        (req.email, req.first_name, req.last_name, req.password)
    else {
        return Err(AppError::Invalid(INVALID));
    };

    if find_by_email(&state, &email).await?.is_some() {
        return Err(AppError::UserExists);
    }

    let password_hash = password::hash(&state.argon2, &plaintext)?;

    // A concurrent registration that got past the lookup trips the UNIQUE
    // constraint here, which converts to AppError::UserExists.
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, first_name, last_name, password, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&email)
    .bind(&first_name)
    .bind(&last_name)
    .bind(&password_hash)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    let authtoken = token::sign(id, &state.encoding_key)?;

    tracing::info!("User registered successfully");
    Ok(Json(RegisterResponse {
        authtoken,
        first_name,
        email,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    const INVALID: &str = "Invalid credential";
    let req = body(payload, INVALID)?;

    if let Err(violations) = Validator::new()
        .required("email", req.email.as_deref())
        .email("email", req.email.as_deref())
        .required("password", req.password.as_deref())
        .length("password", req.password.as_deref(), PASSWORD_MIN, PASSWORD_MAX)
        .finish()
    {
        tracing::warn!(fields = ?violations.fields(), "Login validation failed: {}", violations);
        return Err(AppError::Invalid(INVALID));
    }

    let (Some(email), Some(plaintext)) = (req.email, req.password) else {
        return Err(AppError::Invalid(INVALID));
    };

    let user = find_by_email(&state, &email)
        .await?
        .ok_or(AppError::NotFound(
            "No existing user found. Please register instead.",
        ))?;

    if !password::verify(&state.argon2, &plaintext, &user.password)? {
        return Err(AppError::IncorrectPassword);
    }

    let authtoken = token::sign(user.id, &state.encoding_key)?;

    tracing::info!("User successfully login.");
    Ok(Json(LoginResponse {
        authtoken,
        user_name: user.first_name,
        user_email: user.email,
    }))
}

/// Refreshes `updatedAt` on the record named by the `email` header and
/// re-issues its token. The validated `name` field is not written.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, AppError> {
    const INVALID: &str = "Invalid input";
    let req = body(payload, INVALID)?;

    if let Err(violations) = Validator::new()
        .required("name", req.name.as_deref())
        .finish()
    {
        tracing::warn!(fields = ?violations.fields(), "Update validation failed: {}", violations);
        return Err(AppError::Invalid(INVALID));
    }

    let email = headers
        .get("email")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingEmailHeader)?;

    let mut user = find_by_email(&state, email)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;
    user.updated_at = Some(Utc::now());

    let id = sqlx::query_scalar::<_, i64>(
        "UPDATE users SET first_name = ?, last_name = ?, password = ?, created_at = ?, updated_at = ? WHERE email = ? RETURNING id",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password)
    .bind(user.created_at)
    .bind(user.updated_at)
    .bind(&user.email)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("User not found"))?;

    let authtoken = token::sign(id, &state.encoding_key)?;

    tracing::info!("User profile updated");
    Ok(Json(UpdateResponse { authtoken }))
}
