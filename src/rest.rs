use axum::{
    routing::{post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handlers::auth, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/update", put(auth::update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
