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

//! Compact JWT decoding **without** signature verification.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use jsonwebtoken::Header;
use serde_json::{Map, Value};
use thiserror::Error;

use super::claims::Claims;

/// base64url that accepts both padded and unpadded segments.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors from decoding or verifying a token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Signature(String),
}

/// Decode the payload of a compact JWT into [`Claims`].
///
/// The token must have exactly three `.`-separated segments and the payload
/// must be base64url-encoded JSON object. The signature segment is ignored.
pub fn decode(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE_LENIENT
        .decode(segments[1])
        .map_err(|e| TokenError::Malformed(format!("payload is not base64url: {e}")))?;

    let map: Map<String, Value> = serde_json::from_slice(&payload)
        .map_err(|e| TokenError::Malformed(format!("payload is not a JSON object: {e}")))?;

    Ok(Claims::from_map(map))
}

/// A single claim by name, or `None` if the token is malformed or the claim absent.
pub fn claim(token: &str, name: &str) -> Option<Value> {
    decode(token).ok()?.get(name).cloned()
}

/// Decode the JOSE header (`alg`, `kid`).
pub fn decode_header(token: &str) -> Result<Header, TokenError> {
    jsonwebtoken::decode_header(token)
        .map_err(|e| TokenError::Malformed(format!("invalid JWT header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
    use serde_json::json;

    const HEADER: &str = "eyJhbGciOiJSUzI1NiIsImtpZCI6ImtpZC0xIn0";

    fn fake_jwt(payload: &Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{HEADER}.{body}.fakesig")
    }

    #[test]
    fn decodes_payload_without_verifying() {
        let token = fake_jwt(&json!({
            "sub": "abc-123",
            "token_use": "id",
            "address": {"formatted": "Busan"},
            "aud": ["client"],
        }));
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub(), Some("abc-123"));
        assert_eq!(claims.address_formatted(), Some("Busan"));
        assert_eq!(claims.audiences(), Some(vec![&json!("client")]));
    }

    #[test]
    fn padded_payload_is_accepted() {
        let body = URL_SAFE.encode(br#"{"sub":"x"}"#);
        assert!(body.ends_with('='));
        let token = format!("{HEADER}.{body}.sig");
        assert_eq!(decode(&token).unwrap().sub(), Some("x"));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        assert!(matches!(decode("a.b"), Err(TokenError::Malformed(_))));
        assert!(matches!(decode("a.b.c.d"), Err(TokenError::Malformed(_))));
        assert!(matches!(decode(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn invalid_payload_is_malformed() {
        assert!(matches!(
            decode(&format!("{HEADER}.***.sig")),
            Err(TokenError::Malformed(_))
        ));
        let not_json = URL_SAFE_NO_PAD.encode(b"hello");
        assert!(matches!(
            decode(&format!("{HEADER}.{not_json}.sig")),
            Err(TokenError::Malformed(_))
        ));
        let array = URL_SAFE_NO_PAD.encode(b"[1,2]");
        assert!(matches!(
            decode(&format!("{HEADER}.{array}.sig")),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn claim_lookup() {
        let token = fake_jwt(&json!({"name": "김철수", "exp": 5}));
        assert_eq!(claim(&token, "name"), Some(json!("김철수")));
        assert_eq!(claim(&token, "exp"), Some(json!(5)));
        assert_eq!(claim(&token, "missing"), None);
        assert_eq!(claim("garbage", "name"), None);
    }

    #[test]
    fn header_exposes_kid() {
        let token = fake_jwt(&json!({}));
        let header = decode_header(&token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("kid-1"));
    }
}
