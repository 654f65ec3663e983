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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::config::CognitoConfig;
use crate::db::IdentityStore;
use crate::error::AuthError;
use crate::identity::IdentityResolver;
use crate::login::LoginFlow;
use crate::oauth::{
    ClaimsValidator, CodeExchange, CognitoOAuthClient, JwksCache, JwksVerifier,
    SignatureVerifier, TokenValidator,
};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider settings.
    pub cognito: Arc<CognitoConfig>,
    /// Claim checks on bearer tokens.
    pub validator: Arc<dyn TokenValidator>,
    /// Strict mode only: signature checks on top of `validator`.
    pub signature_verifier: Option<Arc<dyn SignatureVerifier>>,
    pub store: Arc<dyn IdentityStore>,
    pub resolver: IdentityResolver,
    pub login: Arc<LoginFlow>,
}

impl AppState {
    /// Assemble state from already-built components.
    pub fn new(
        cognito: Arc<CognitoConfig>,
        exchange: Arc<dyn CodeExchange>,
        validator: Arc<dyn TokenValidator>,
        signature_verifier: Option<Arc<dyn SignatureVerifier>>,
        store: Arc<dyn IdentityStore>,
    ) -> Self {
        let resolver = IdentityResolver::new(store.clone());
        let login = Arc::new(LoginFlow::new(
            exchange,
            resolver.clone(),
            signature_verifier.clone(),
        ));
        Self {
            cognito,
            validator,
            signature_verifier,
            store,
            resolver,
            login,
        }
    }

    /// Wire the production components for `cognito` over `store`.
    pub fn from_config(
        cognito: CognitoConfig,
        store: Arc<dyn IdentityStore>,
    ) -> Result<Self, AuthError> {
        let cognito = Arc::new(cognito);
        let exchange = CognitoOAuthClient::new(cognito.clone())?;
        let validator = ClaimsValidator::new(cognito.clone());

        let signature_verifier: Option<Arc<dyn SignatureVerifier>> = if cognito.verify_signature {
            let http = reqwest::Client::builder()
                .timeout(cognito.http_timeout)
                .build()
                .map_err(|e| {
                    AuthError::SignatureVerification(format!("failed to build HTTP client: {e}"))
                })?;
            let jwks = JwksCache::new(cognito.jwks_url.clone(), http);
            Some(Arc::new(JwksVerifier::new(jwks, &cognito)))
        } else {
            tracing::warn!(
                "COGNITO_VERIFY_SIGNATURE is off: token signatures are NOT verified. \
                 Tokens must arrive over a channel that already checked them."
            );
            None
        };

        Ok(Self::new(
            cognito,
            Arc::new(exchange),
            Arc::new(validator),
            signature_verifier,
            store,
        ))
    }
}
