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

//! Integration tests for `COGNITO_VERIFY_SIGNATURE=true`: bearer tokens must be
//! RS256-signed by a key published at the JWKS endpoint.

mod test_helpers;

use axum::body::Body;
use axum::http::StatusCode;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use test_helpers::*;
use tower::ServiceExt;
use user_types::responses::{APIResponse, UserProfile};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KID: &str = "strict-kid";

/// An RSA signing key and the JWKS document that publishes its public half.
fn signing_key() -> (EncodingKey, Value) {
    let mut rng = rand::thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let pem = private_key
        .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
        .unwrap();
    let encoding = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();

    let public_key = private_key.to_public_key();
    let jwks = json!({
        "keys": [{
            "kid": KID,
            "kty": "RSA",
            "alg": "RS256",
            "use": "sig",
            "n": URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            "e": URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        }]
    });
    (encoding, jwks)
}

fn sign(key: &EncodingKey, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KID.to_string());
    encode(&header, claims, key).unwrap()
}

async fn strict_app() -> (axum::Router, EncodingKey, MockServer) {
    let server = MockServer::start().await;
    let (key, jwks) = signing_key();
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.verify_signature = true;
    let (app, _) = build_app(config);
    (app, key, server)
}

async fn me_status(app: &axum::Router, token: &str) -> axum::response::Response {
    let req = request_with_bearer("GET", "/api/users/me", token)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

#[tokio::test]
async fn test_signed_token_is_accepted() {
    let (app, key, _server) = strict_app().await;
    let mut claims = id_claims("signed-sub");
    claims["name"] = json!("서명됨");

    let resp = me_status(&app, &sign(&key, &claims)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: APIResponse<UserProfile> = response_json(resp).await;
    assert_eq!(body.result.user_id, "signed-sub");
    assert_eq!(body.result.user_name, "서명됨");
}

#[tokio::test]
async fn test_unsigned_token_is_anonymous() {
    let (app, _key, _server) = strict_app().await;
    let resp = me_status(&app, &unsigned_token(&id_claims("forged-sub"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_by_other_key_is_anonymous() {
    let (app, _key, _server) = strict_app().await;
    let (other_key, _) = signing_key();
    let resp = me_status(&app, &sign(&other_key, &id_claims("forged-sub"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
