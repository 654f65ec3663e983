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

//! Claim-based token validation.
//!
//! Only claims are inspected here; the signature is assumed to have been
//! checked by the channel the token arrived over (ALB / reverse proxy). Callers
//! that want cryptographic assurance compose this with
//! [`super::verify::SignatureVerifier`].
//!
//! Checks, in order:
//! 1. Token is non-empty
//! 2. Token decodes (3 segments, base64url JSON payload)
//! 3. `token_use` is `id` or `access`
//! 4. `iss` equals the configured user pool issuer
//! 5. If `aud` is present and non-empty, its first entry is the client id
//!    string (access tokens carry no `aud`, so absence is accepted; an `aud`
//!    of any other type is rejected)
//! 6. `exp` is present and in the future

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::config::CognitoConfig;
use crate::error::AuthError;

use super::claims::Claims;
use super::codec;

/// Why a token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Missing,
    Malformed,
    TokenUse,
    Issuer,
    Audience,
    Expired,
}

impl RejectReason {
    /// Stable reason code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Missing => "TOKEN_MISSING",
            RejectReason::Malformed => "TOKEN_MALFORMED",
            RejectReason::TokenUse => "TOKEN_USE_INVALID",
            RejectReason::Issuer => "ISSUER_MISMATCH",
            RejectReason::Audience => "AUDIENCE_MISMATCH",
            RejectReason::Expired => "TOKEN_EXPIRED",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of [`TokenValidator::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenCheck {
    Valid(Claims),
    Invalid(RejectReason),
}

impl TokenCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenCheck::Valid(_))
    }

    pub fn into_result(self) -> Result<Claims, AuthError> {
        match self {
            TokenCheck::Valid(claims) => Ok(claims),
            TokenCheck::Invalid(RejectReason::Malformed) => {
                Err(AuthError::MalformedToken("token could not be decoded".to_string()))
            }
            TokenCheck::Invalid(reason) => Err(AuthError::TokenExpiredOrUntrusted(reason)),
        }
    }
}

/// Decides whether a bearer token is trusted.
pub trait TokenValidator: Send + Sync {
    /// Never panics and never errors: every failure is an
    /// [`TokenCheck::Invalid`] with a reason.
    fn validate(&self, token: &str) -> TokenCheck;
}

/// Claim-inspection validator bound to one Cognito user pool.
#[derive(Debug, Clone)]
pub struct ClaimsValidator {
    config: Arc<CognitoConfig>,
    issuer: String,
}

impl ClaimsValidator {
    pub fn new(config: Arc<CognitoConfig>) -> Self {
        let issuer = config.issuer();
        Self { config, issuer }
    }

    /// Validate against an explicit clock (unix seconds).
    pub fn validate_at(&self, token: &str, now: i64) -> TokenCheck {
        if token.is_empty() {
            tracing::warn!("Token is missing or empty");
            return TokenCheck::Invalid(RejectReason::Missing);
        }

        let claims = match codec::decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Token could not be decoded: {e}");
                return TokenCheck::Invalid(RejectReason::Malformed);
            }
        };

        if claims.token_use().is_none() {
            tracing::warn!("Unexpected token_use: {:?}", claims.get("token_use"));
            return TokenCheck::Invalid(RejectReason::TokenUse);
        }

        if claims.iss() != Some(self.issuer.as_str()) {
            tracing::warn!("Unexpected token issuer: {:?}", claims.iss());
            return TokenCheck::Invalid(RejectReason::Issuer);
        }

        match claims.audiences().as_deref() {
            None | Some([]) => {
                tracing::debug!("Token has no aud claim (likely an access token)");
            }
            Some([first, ..]) if first.as_str() == Some(self.config.client_id.as_str()) => {}
            Some([first, ..]) => {
                tracing::warn!("Unexpected token audience: {first}");
                return TokenCheck::Invalid(RejectReason::Audience);
            }
        }

        match claims.exp() {
            Some(exp) if exp > now => {}
            exp => {
                tracing::warn!("Token expired or missing exp: exp={exp:?}, now={now}");
                return TokenCheck::Invalid(RejectReason::Expired);
            }
        }

        tracing::debug!("Token claims accepted for sub={:?}", claims.sub());
        TokenCheck::Valid(claims)
    }
}

impl TokenValidator for ClaimsValidator {
    fn validate(&self, token: &str) -> TokenCheck {
        self.validate_at(token, Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::{json, Value};

    const REGION: &str = "ap-northeast-2";
    const POOL: &str = "ap-northeast-2_TestPool";
    const CLIENT: &str = "client-abc";

    fn validator() -> ClaimsValidator {
        let cfg = CognitoConfig::new(
            REGION,
            POOL,
            CLIENT,
            "secret",
            "https://fog.auth.example.com",
            "https://app.example.com/callback",
        )
        .unwrap();
        ClaimsValidator::new(Arc::new(cfg))
    }

    fn issuer() -> String {
        format!("https://cognito-idp.{REGION}.amazonaws.com/{POOL}")
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }

    fn token(payload: Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        format!("eyJhbGciOiJSUzI1NiJ9.{body}.sig")
    }

    fn id_claims() -> Value {
        json!({
            "sub": "user-1",
            "token_use": "id",
            "iss": issuer(),
            "aud": CLIENT,
            "exp": now() + 3600,
        })
    }

    fn with(mut base: Value, key: &str, value: Value) -> Value {
        base[key] = value;
        base
    }

    fn without(mut base: Value, key: &str) -> Value {
        base.as_object_mut().unwrap().remove(key);
        base
    }

    #[test]
    fn valid_id_token_is_accepted() {
        let check = validator().validate(&token(id_claims()));
        match check {
            TokenCheck::Valid(claims) => assert_eq!(claims.sub(), Some("user-1")),
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn access_token_without_aud_is_accepted() {
        let claims = with(without(id_claims(), "aud"), "token_use", json!("access"));
        assert!(validator().validate(&token(claims)).is_valid());
    }

    #[test]
    fn empty_aud_list_is_tolerated() {
        let claims = with(id_claims(), "aud", json!([]));
        assert!(validator().validate(&token(claims)).is_valid());
    }

    #[test]
    fn empty_token_is_missing() {
        assert_eq!(
            validator().validate(""),
            TokenCheck::Invalid(RejectReason::Missing)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            validator().validate("not-a-jwt"),
            TokenCheck::Invalid(RejectReason::Malformed)
        );
    }

    #[test]
    fn refresh_token_use_is_always_rejected() {
        let claims = with(id_claims(), "token_use", json!("refresh"));
        assert_eq!(
            validator().validate(&token(claims)),
            TokenCheck::Invalid(RejectReason::TokenUse)
        );
    }

    #[test]
    fn missing_token_use_is_rejected() {
        assert_eq!(
            validator().validate(&token(without(id_claims(), "token_use"))),
            TokenCheck::Invalid(RejectReason::TokenUse)
        );
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let claims = with(
            id_claims(),
            "iss",
            json!("https://cognito-idp.us-east-1.amazonaws.com/other"),
        );
        assert_eq!(
            validator().validate(&token(claims)),
            TokenCheck::Invalid(RejectReason::Issuer)
        );
        assert_eq!(
            validator().validate(&token(without(id_claims(), "iss"))),
            TokenCheck::Invalid(RejectReason::Issuer)
        );
    }

    #[test]
    fn only_first_audience_is_compared() {
        let claims = with(id_claims(), "aud", json!(["someone-else", CLIENT]));
        assert_eq!(
            validator().validate(&token(claims)),
            TokenCheck::Invalid(RejectReason::Audience)
        );

        let claims = with(id_claims(), "aud", json!([CLIENT, "someone-else"]));
        assert!(validator().validate(&token(claims)).is_valid());
    }

    #[test]
    fn non_string_first_audience_is_rejected() {
        let claims = with(id_claims(), "aud", json!([7, CLIENT]));
        assert_eq!(
            validator().validate(&token(claims)),
            TokenCheck::Invalid(RejectReason::Audience)
        );
    }

    #[test]
    fn ill_typed_aud_is_rejected_not_treated_as_absent() {
        for aud in [json!(42), json!({}), json!(null)] {
            let claims = with(id_claims(), "aud", aud.clone());
            assert_eq!(
                validator().validate(&token(claims)),
                TokenCheck::Invalid(RejectReason::Audience),
                "aud = {aud}"
            );
        }
    }

    #[test]
    fn expired_one_second_ago_is_rejected() {
        let claims = with(id_claims(), "exp", json!(now() - 1));
        assert_eq!(
            validator().validate(&token(claims)),
            TokenCheck::Invalid(RejectReason::Expired)
        );
    }

    #[test]
    fn exp_equal_to_now_is_rejected() {
        let v = validator();
        let claims = with(id_claims(), "exp", json!(1_000));
        assert_eq!(
            v.validate_at(&token(claims.clone()), 1_000),
            TokenCheck::Invalid(RejectReason::Expired)
        );
        assert!(v.validate_at(&token(claims), 999).is_valid());
    }

    #[test]
    fn missing_exp_is_rejected() {
        assert_eq!(
            validator().validate(&token(without(id_claims(), "exp"))),
            TokenCheck::Invalid(RejectReason::Expired)
        );
    }

    #[test]
    fn into_result_maps_reasons() {
        assert!(matches!(
            TokenCheck::Invalid(RejectReason::Malformed).into_result(),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            TokenCheck::Invalid(RejectReason::Expired).into_result(),
            Err(AuthError::TokenExpiredOrUntrusted(RejectReason::Expired))
        ));
    }
}
