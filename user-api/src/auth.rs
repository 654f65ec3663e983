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

//! Axum extractor that resolves the caller from the `Authorization: Bearer` header.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::identity::UserIdentity;
use crate::oauth::TokenCheck;
use crate::state::AppState;

/// The caller of the current request, or `None` when anonymous.
///
/// A missing, invalid or unverifiable token makes the request anonymous; the
/// extractor itself never rejects. Handlers that need a user call
/// [`CurrentUser::require`].
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> Result<..., AppError> {
///     let user = user.require()?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserIdentity>);

impl CurrentUser {
    pub fn require(self) -> Result<UserIdentity, AppError> {
        self.0.ok_or_else(AppError::unauthorized)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(CurrentUser(None));
        };
        Ok(CurrentUser(authenticate(state, token).await))
    }
}

/// The token from `Authorization: Bearer <token>`, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

async fn authenticate(state: &AppState, token: &str) -> Option<UserIdentity> {
    let claims = match state.validator.validate(token) {
        TokenCheck::Valid(claims) => claims,
        TokenCheck::Invalid(reason) => {
            tracing::debug!("Bearer token rejected: {}", reason.code());
            return None;
        }
    };

    let claims = match &state.signature_verifier {
        Some(verifier) => verifier.verify_signature(token).await.ok()?,
        None => claims,
    };

    match state.resolver.resolve_or_provision(&claims).await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Could not resolve user for bearer token: {e}");
            None
        }
    }
}
