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

//! Response types for the user service REST API.
//!
//! Every endpoint returns an [`APIResponse<T>`] envelope:
//! - On success: `{ "success": true,  "result": <T> }`
//! - On failure: `{ "success": false, "result": <APIError> }`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Generic envelope
// ---------------------------------------------------------------------------

/// Top-level API response envelope.
///
/// # Success example
///
/// ```json
/// { "success": true, "result": { "user_id": "5f1c...", "user_name": "홍길동", ... } }
/// ```
///
/// # Error example
///
/// ```json
/// { "success": false, "result": { "code": "LOGIN_FAILED", "message": "..." } }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIResponse<A: Serialize> {
    pub success: bool,
    pub result: A,
}

impl<A: Serialize> APIResponse<A> {
    /// Wrap a successful result.
    pub fn ok(result: A) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

impl APIResponse<crate::error::APIError> {
    /// Wrap an error result.
    pub fn error(err: crate::error::APIError) -> Self {
        Self {
            success: false,
            result: err,
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint-specific response payloads
// ---------------------------------------------------------------------------

/// Response payload for `GET /api/users/login/url`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginUrlResponse {
    /// Provider authorize URL the browser should be redirected to.
    pub url: String,
    /// Anti-CSRF state embedded in `url`; the caller must check it on callback.
    pub state: String,
}

/// Local user profile. Used by `/me`, `PUT /me` and the login response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub user_name: String,
    /// Canonical international form (e.g. `+82 10 1234 5678`) or a sentinel.
    pub phone_number: String,
    /// Local display form (e.g. `010-1234-5678`).
    pub phone_display: String,
    pub user_location: String,
}

/// Response payload for `POST /api/users/login/callback`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Always `"Bearer"`.
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    pub user: UserProfile,
}

/// Response payload for `POST /api/users/logout`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogoutResponse {
    pub user_id: String,
    pub message: String,
    /// Hosted UI logout URL; the client navigates there to end the provider session.
    pub logout_url: String,
}

/// Response payload for `GET /api/users/count`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserCountResponse {
    pub count: i64,
}

/// Response payload for `GET /api/users/{id}/name`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserNameResponse {
    pub user_id: String,
    pub user_name: String,
}
