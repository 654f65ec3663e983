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

//! The login state machine.
//!
//! ```text
//! CodeReceived -> TokenExchanged -> ClaimsExtracted -> IdentityResolved -> SessionEstablished
//!       \               \                 \                  \
//!        `---------------`-----------------`------------------`--> LoginFailed { stage, error }
//! ```
//!
//! Nothing is written to the identity store before `IdentityResolved`.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::AuthError;
use crate::identity::{IdentityResolver, UserIdentity};
use crate::oauth::{codec, Claims, CodeExchange, SignatureVerifier, TokenSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    CodeReceived,
    TokenExchanged,
    ClaimsExtracted,
    IdentityResolved,
    SessionEstablished,
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginStage::CodeReceived => "code received",
            LoginStage::TokenExchanged => "token exchanged",
            LoginStage::ClaimsExtracted => "claims extracted",
            LoginStage::IdentityResolved => "identity resolved",
            LoginStage::SessionEstablished => "session established",
        };
        f.write_str(name)
    }
}

/// A login that stopped at `stage`; `stage` is the step that failed.
#[derive(Debug, Error)]
#[error("login failed at {stage}: {error}")]
pub struct LoginFailed {
    pub stage: LoginStage,
    #[source]
    pub error: AuthError,
}

/// A completed login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub tokens: TokenSet,
    pub claims: Claims,
    pub identity: UserIdentity,
}

pub struct LoginFlow {
    exchange: Arc<dyn CodeExchange>,
    resolver: IdentityResolver,
    verifier: Option<Arc<dyn SignatureVerifier>>,
}

impl LoginFlow {
    /// `verifier` enables signature checks on the ID token (strict mode).
    pub fn new(
        exchange: Arc<dyn CodeExchange>,
        resolver: IdentityResolver,
        verifier: Option<Arc<dyn SignatureVerifier>>,
    ) -> Self {
        Self {
            exchange,
            resolver,
            verifier,
        }
    }

    /// Drive one authorization code through to an established session.
    pub async fn complete(&self, code: &str) -> Result<LoginSession, LoginFailed> {
        let mut stage = LoginStage::CodeReceived;
        tracing::debug!("Login: {stage}");

        let tokens = self
            .exchange
            .exchange_code(code)
            .await
            .map_err(|error| fail(LoginStage::TokenExchanged, error))?;
        stage = LoginStage::TokenExchanged;
        tracing::debug!("Login: {stage}");

        let claims = self
            .extract_claims(&tokens)
            .await
            .map_err(|error| fail(LoginStage::ClaimsExtracted, error))?;
        stage = LoginStage::ClaimsExtracted;
        tracing::debug!("Login: {stage}");

        let identity = self
            .resolver
            .resolve_or_provision(&claims)
            .await
            .map_err(|error| fail(LoginStage::IdentityResolved, error))?;
        stage = LoginStage::IdentityResolved;
        tracing::debug!("Login: {stage}");

        stage = LoginStage::SessionEstablished;
        tracing::info!("Login: {stage} for user {}", identity.user_id);
        Ok(LoginSession {
            tokens,
            claims,
            identity,
        })
    }

    async fn extract_claims(&self, tokens: &TokenSet) -> Result<Claims, AuthError> {
        let id_token = tokens.id_token.as_deref().ok_or(AuthError::MissingIdToken)?;
        match &self.verifier {
            Some(verifier) => Ok(verifier.verify_signature(id_token).await?),
            None => Ok(codec::decode(id_token)?),
        }
    }
}

fn fail(stage: LoginStage, error: AuthError) -> LoginFailed {
    tracing::warn!("Login failed at {stage}: {error}");
    LoginFailed { stage, error }
}
