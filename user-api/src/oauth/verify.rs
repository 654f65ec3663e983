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

//! RS256 signature verification against the user pool JWKS.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, Validation};

use crate::config::CognitoConfig;

use super::claims::Claims;
use super::codec::{decode_header, TokenError};
use super::jwks::JwksCache;

/// Cryptographic token check, used on top of claim validation in strict mode.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    async fn verify_signature(&self, token: &str) -> Result<Claims, TokenError>;
}

/// [`SignatureVerifier`] backed by a [`JwksCache`].
pub struct JwksVerifier {
    jwks: Arc<JwksCache>,
    issuer: String,
    client_id: String,
}

impl JwksVerifier {
    pub fn new(jwks: Arc<JwksCache>, config: &CognitoConfig) -> Self {
        Self {
            jwks,
            issuer: config.issuer(),
            client_id: config.client_id.clone(),
        }
    }
}

#[async_trait]
impl SignatureVerifier for JwksVerifier {
    async fn verify_signature(&self, token: &str) -> Result<Claims, TokenError> {
        let result = verify_rs256(&self.jwks, token, &self.issuer, &self.client_id).await;
        if let Err(e) = &result {
            tracing::warn!("JWT signature verification failed: {e}");
        }
        result
    }
}

/// Verify a token's RS256 signature and decode its claims.
///
/// Validates: signature (key chosen by header `kid`), `exp`, `iss` == `issuer`,
/// `aud` == `audience`.
pub async fn verify_rs256(
    jwks: &JwksCache,
    token: &str,
    issuer: &str,
    audience: &str,
) -> Result<Claims, TokenError> {
    let header = decode_header(token)?;

    let kid = header
        .kid
        .as_deref()
        .ok_or_else(|| TokenError::Signature("JWT header missing kid".to_string()))?;

    let key = jwks.get_key(kid).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| TokenError::Signature(format!("JWT validation failed: {e}")))?;

    Ok(token_data.claims)
}
