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

//! API error types.
//!
//! Every failed API response is returned as `APIResponse<APIError>` with `success: false`.

use serde::{Deserialize, Serialize};

/// Structured error returned in the `result` field of a failed [`super::APIResponse`].
///
/// The `code` field is a machine-readable identifier (e.g. `"LOGIN_FAILED"`).
/// The `message` field is a human-readable description suitable for display.
/// The `engineering_error` field carries debug-level detail that is useful
/// during development but should be stripped or redacted in production.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIError {
    /// Machine-readable error code (e.g. `"UNAUTHORIZED"`, `"USER_NOT_FOUND"`).
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional engineering-level detail for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineering_error: Option<String>,
}

impl APIError {
    pub fn unauthorized() -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: "Authentication required.".to_string(),
            engineering_error: None,
        }
    }

    pub fn login_failed(detail: &str) -> Self {
        Self {
            code: "LOGIN_FAILED".to_string(),
            message: "Login failed. Please try again.".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }

    pub fn invalid_request(detail: &str) -> Self {
        Self {
            code: "INVALID_REQUEST".to_string(),
            message: format!("Invalid request: {detail}"),
            engineering_error: None,
        }
    }

    pub fn user_not_found(user_id: &str) -> Self {
        Self {
            code: "USER_NOT_FOUND".to_string(),
            message: format!("User '{user_id}' not found"),
            engineering_error: None,
        }
    }

    pub fn phone_number_taken(phone_number: &str) -> Self {
        Self {
            code: "PHONE_NUMBER_TAKEN".to_string(),
            message: format!("Phone number '{phone_number}' is already registered"),
            engineering_error: None,
        }
    }

    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "Internal server error".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for APIError {}
