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

//! Shared test helpers for user-api integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http;
use axum::response::Response;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;
use user_api::config::CognitoConfig;
use user_api::db::MemoryIdentityStore;
use user_api::{routes, state::AppState};

pub const REGION: &str = "ap-northeast-2";
pub const USER_POOL_ID: &str = "ap-northeast-2_TestPool";
pub const CLIENT_ID: &str = "test-client-id";

pub fn issuer() -> String {
    format!("https://cognito-idp.{REGION}.amazonaws.com/{USER_POOL_ID}")
}

/// Cognito configuration whose token and JWKS endpoints point at `provider_uri`
/// (usually a `wiremock::MockServer`).
pub fn test_config(provider_uri: &str) -> CognitoConfig {
    let mut cfg = CognitoConfig::new(
        REGION,
        USER_POOL_ID,
        CLIENT_ID,
        "test-client-secret",
        "https://fog-test.auth.ap-northeast-2.amazoncognito.com",
        "http://localhost:3000/login/callback",
    )
    .expect("test config");
    cfg.token_endpoint = Url::parse(&format!("{provider_uri}/oauth2/token")).expect("token url");
    cfg.jwks_url = Url::parse(&format!("{provider_uri}/.well-known/jwks.json")).expect("jwks url");
    cfg
}

/// Build the Axum router over an in-memory store, ready for `tower::ServiceExt::oneshot`.
pub fn build_app(config: CognitoConfig) -> (Router, Arc<MemoryIdentityStore>) {
    let store = Arc::new(MemoryIdentityStore::new());
    let state = AppState::from_config(config, store.clone()).expect("app state");
    (routes::router().with_state(state), store)
}

/// Unsigned compact JWT with the given payload.
pub fn unsigned_token(payload: &Value) -> String {
    let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).expect("payload"));
    format!("eyJhbGciOiJSUzI1NiIsImtpZCI6InRlc3Qta2lkIn0.{body}.c2ln")
}

/// Claims of an ID token the test pool would issue for `sub`.
pub fn id_claims(sub: &str) -> Value {
    json!({
        "sub": sub,
        "token_use": "id",
        "iss": issuer(),
        "aud": CLIENT_ID,
        "exp": chrono::Utc::now().timestamp() + 3600,
    })
}

/// A request carrying `Authorization: Bearer <token>`.
pub fn request_with_bearer(method: &str, uri: &str, token: &str) -> http::request::Builder {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
}

/// Consume a response body and deserialize JSON into `T`.
pub async fn response_json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("deserialize response body")
}
