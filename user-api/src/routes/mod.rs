/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Axum router configuration for the user service.

pub mod users;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Login / session
        .route("/api/users/login/url", get(users::login_url))
        .route("/api/users/login/callback", post(users::login_callback))
        .route("/api/users/logout", post(users::logout))
        // Profile
        .route("/api/users/me", get(users::get_me).put(users::update_me))
        .route("/api/users/count", get(users::count_users))
        .route("/api/users/{user_id}/name", get(users::get_user_name))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}
