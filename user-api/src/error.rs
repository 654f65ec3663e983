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

//! Error types.
//!
//! [`AuthError`] is the domain error of the token subsystem. [`AppError`] is the
//! HTTP-facing error that implements Axum's `IntoResponse`; every error is
//! returned as `APIResponse<APIError>` with `success: false`, paired with the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use user_types::{APIError, APIResponse};

use crate::db::StoreError;
use crate::oauth::codec::TokenError;
use crate::oauth::validate::RejectReason;

/// Failures of the login and token handling pipeline.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is not a structurally valid JWT.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// A claim check (token use, issuer, audience, expiry) failed.
    #[error("token expired or untrusted: {0}")]
    TokenExpiredOrUntrusted(RejectReason),

    /// Strict mode only: the signature could not be verified.
    #[error("signature verification failed: {0}")]
    SignatureVerification(String),

    /// The provider token endpoint failed or could not be reached.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("token response did not contain an id_token")]
    MissingIdToken,

    #[error("token has no sub claim")]
    MissingSubject,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(detail) => AuthError::MalformedToken(detail),
            TokenError::Signature(detail) => AuthError::SignatureVerification(detail),
        }
    }
}

/// Application-level error that pairs an HTTP status code with an [`APIError`].
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: APIError,
}

impl AppError {
    pub fn new(status: StatusCode, body: APIError) -> Self {
        Self { status, body }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, APIError::unauthorized())
    }

    pub fn login_failed(detail: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, APIError::login_failed(detail))
    }

    pub fn invalid_request(detail: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::invalid_request(detail))
    }

    pub fn user_not_found(user_id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, APIError::user_not_found(user_id))
    }

    pub fn phone_number_taken(phone_number: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            APIError::phone_number_taken(phone_number),
        )
    }

    pub fn internal(detail: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            APIError::internal_error(detail),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = APIResponse::error(self.body);
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Identity store error: {err}");
        Self::internal(&err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => e.into(),
            AuthError::MalformedToken(_)
            | AuthError::TokenExpiredOrUntrusted(_)
            | AuthError::SignatureVerification(_) => Self::unauthorized(),
            other => Self::login_failed(&other.to_string()),
        }
    }
}
