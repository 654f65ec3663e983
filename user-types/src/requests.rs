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

//! Request types for the user service REST API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/users/login/callback`.
///
/// Both fields are optional at the wire level so a missing `code` can be
/// answered with `400 INVALID_REQUEST` instead of a deserialization failure.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoginCallbackRequest {
    /// Authorization code returned by the identity provider.
    #[serde(default)]
    pub code: Option<String>,

    /// Anti-CSRF state echoed back by the provider. Opaque to this service.
    #[serde(default)]
    pub state: Option<String>,
}

/// Request body for `PUT /api/users/me`. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub user_name: Option<String>,

    /// Any accepted input format; stored in canonical international form.
    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub user_location: Option<String>,
}
