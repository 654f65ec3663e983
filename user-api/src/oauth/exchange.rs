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

//! Hosted UI URL construction and authorization code → token exchange.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::CognitoConfig;
use crate::error::AuthError;

/// Raw response from the Cognito token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Trades an authorization code for tokens.
#[async_trait]
pub trait CodeExchange: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError>;
}

/// Build the hosted UI authorization URL. Parameters are URL-encoded.
pub fn build_login_url(config: &CognitoConfig, state: &str) -> String {
    let mut url = config.authorize_endpoint.clone();
    url.query_pairs_mut()
        .append_pair("response_type", &config.response_type)
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", &config.scope)
        .append_pair("state", state);
    url.to_string()
}

/// Build the hosted UI logout URL that clears the provider session.
pub fn build_logout_url(config: &CognitoConfig) -> String {
    let mut url = config.logout_endpoint.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("logout_uri", &config.logout_redirect_uri);
    url.to_string()
}

/// [`CodeExchange`] against the Cognito token endpoint. No retries.
#[derive(Clone)]
pub struct CognitoOAuthClient {
    http: reqwest::Client,
    config: Arc<CognitoConfig>,
}

impl CognitoOAuthClient {
    /// Create a client whose requests are bounded by `config.http_timeout`.
    pub fn new(config: Arc<CognitoConfig>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::TokenExchange(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: Arc<CognitoConfig>) -> Self {
        Self { http, config }
    }

    pub fn build_login_url(&self, state: &str) -> String {
        build_login_url(&self.config, state)
    }
}

#[async_trait]
impl CodeExchange for CognitoOAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        let params = [
            ("grant_type", self.config.grant_type.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_endpoint.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Cognito token request failed: {e}");
                AuthError::TokenExchange(format!("token request failed: {e}"))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Cognito token request failed. Status: {status}, Body: {body}");
            return Err(AuthError::TokenExchange(format!(
                "token endpoint returned HTTP {status}"
            )));
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("failed to read token response: {e}")))?;

        let tokens: TokenSet = serde_json::from_str(&body_text).map_err(|e| {
            tracing::error!("Cognito token response could not be parsed: {e}");
            AuthError::TokenExchange(format!("failed to parse token response: {e}"))
        })?;

        if tokens.access_token.is_empty() {
            tracing::error!("Cognito token response has an empty access_token");
            return Err(AuthError::TokenExchange(
                "token response has no access_token".to_string(),
            ));
        }

        tracing::info!(
            has_id_token = tokens.id_token.is_some(),
            has_refresh_token = tokens.refresh_token.is_some(),
            "Authorization code exchanged"
        );
        Ok(tokens)
    }
}
