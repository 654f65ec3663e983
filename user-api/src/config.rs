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

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use url::Url;

const DEFAULT_SCOPE: &str = "openid email phone profile";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration for the user service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// Where user records live.
    pub store: StoreBackend,
    /// Identity provider trust settings.
    pub cognito: CognitoConfig,
}

/// Identity store selection (`USER_STORE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL, connection string from `DATABASE_URL`.
    Postgres { database_url: String },
    /// Process-local map. Records are lost on restart.
    Memory,
}

/// AWS Cognito user pool settings. Loaded once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Hosted UI domain, e.g. `https://fog.auth.ap-northeast-2.amazoncognito.com`.
    pub domain: String,
    pub authorize_endpoint: Url,
    pub token_endpoint: Url,
    pub logout_endpoint: Url,
    pub jwks_url: Url,
    pub redirect_uri: String,
    /// Where Cognito sends the browser after logout.
    pub logout_redirect_uri: String,
    pub scope: String,
    pub response_type: String,
    pub grant_type: String,
    /// Verify token signatures against the JWKS in addition to claim checks.
    pub verify_signature: bool,
    /// Upper bound for every outbound call to the provider.
    pub http_timeout: Duration,
}

impl CognitoConfig {
    /// Build a configuration with every optional setting at its default.
    ///
    /// Endpoints are derived from `domain` using the Cognito hosted UI layout
    /// and the JWKS URL from the issuer.
    pub fn new(
        region: &str,
        user_pool_id: &str,
        client_id: &str,
        client_secret: &str,
        domain: &str,
        redirect_uri: &str,
    ) -> Result<Self, String> {
        let domain = domain.trim_end_matches('/').to_string();
        let issuer = issuer_for(region, user_pool_id);

        Ok(Self {
            region: region.to_string(),
            user_pool_id: user_pool_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            authorize_endpoint: parse_url(
                "authorize endpoint",
                &format!("{domain}/oauth2/authorize"),
            )?,
            token_endpoint: parse_url("token endpoint", &format!("{domain}/oauth2/token"))?,
            logout_endpoint: parse_url("logout endpoint", &format!("{domain}/logout"))?,
            jwks_url: parse_url("JWKS URL", &format!("{issuer}/.well-known/jwks.json"))?,
            domain,
            redirect_uri: redirect_uri.to_string(),
            logout_redirect_uri: redirect_uri.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            response_type: "code".to_string(),
            grant_type: "authorization_code".to_string(),
            verify_signature: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    /// The only `iss` value accepted on incoming tokens.
    pub fn issuer(&self) -> String {
        issuer_for(&self.region, &self.user_pool_id)
    }

    /// Load from `COGNITO_*` environment variables.
    fn from_env() -> Result<Self, String> {
        let mut cfg = Self::new(
            &required("COGNITO_REGION")?,
            &required("COGNITO_USER_POOL_ID")?,
            &required("COGNITO_CLIENT_ID")?,
            &required("COGNITO_CLIENT_SECRET")?,
            &required("COGNITO_DOMAIN")?,
            &required("COGNITO_REDIRECT_URI")?,
        )?;

        if let Some(v) = optional("COGNITO_AUTHORIZE_ENDPOINT") {
            cfg.authorize_endpoint = parse_url("COGNITO_AUTHORIZE_ENDPOINT", &v)?;
        }
        if let Some(v) = optional("COGNITO_TOKEN_ENDPOINT") {
            cfg.token_endpoint = parse_url("COGNITO_TOKEN_ENDPOINT", &v)?;
        }
        if let Some(v) = optional("COGNITO_LOGOUT_ENDPOINT") {
            cfg.logout_endpoint = parse_url("COGNITO_LOGOUT_ENDPOINT", &v)?;
        }
        if let Some(v) = optional("COGNITO_JWKS_URL") {
            cfg.jwks_url = parse_url("COGNITO_JWKS_URL", &v)?;
        }
        if let Some(v) = optional("COGNITO_LOGOUT_REDIRECT_URI") {
            cfg.logout_redirect_uri = v;
        }
        if let Some(v) = optional("COGNITO_SCOPE") {
            cfg.scope = v;
        }
        if let Some(v) = optional("COGNITO_RESPONSE_TYPE") {
            cfg.response_type = v;
        }
        if let Some(v) = optional("COGNITO_GRANT_TYPE") {
            cfg.grant_type = v;
        }
        if let Some(v) = optional("COGNITO_VERIFY_SIGNATURE") {
            cfg.verify_signature = parse_bool(&v)
                .ok_or("COGNITO_VERIFY_SIGNATURE must be true or false")?;
        }
        if let Some(v) = optional("COGNITO_HTTP_TIMEOUT_SECS") {
            let secs = v
                .parse::<u64>()
                .map_err(|_| "COGNITO_HTTP_TIMEOUT_SECS must be a valid integer")?;
            cfg.http_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }

    /// Log the non-secret settings once at startup.
    pub fn log_summary(&self) {
        tracing::info!(
            region = %self.region,
            user_pool_id = %self.user_pool_id,
            client_id = %self.client_id,
            domain = %self.domain,
            jwks_url = %self.jwks_url,
            redirect_uri = %self.redirect_uri,
            verify_signature = self.verify_signature,
            "Cognito configuration loaded"
        );
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `COGNITO_REGION`, `COGNITO_USER_POOL_ID`, `COGNITO_CLIENT_ID`,
    ///   `COGNITO_CLIENT_SECRET`, `COGNITO_DOMAIN`, `COGNITO_REDIRECT_URI`
    /// - `DATABASE_URL` unless `USER_STORE=memory`
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8080"`)
    /// - `USER_STORE` (`postgres` | `memory`, default: `postgres`)
    /// - `COGNITO_AUTHORIZE_ENDPOINT`, `COGNITO_TOKEN_ENDPOINT`,
    ///   `COGNITO_LOGOUT_ENDPOINT`, `COGNITO_JWKS_URL`, `COGNITO_LOGOUT_REDIRECT_URI`
    /// - `COGNITO_SCOPE`, `COGNITO_RESPONSE_TYPE`, `COGNITO_GRANT_TYPE`
    /// - `COGNITO_VERIFY_SIGNATURE` (default: `false`)
    /// - `COGNITO_HTTP_TIMEOUT_SECS` (default: `10`)
    pub fn from_env() -> Result<Self, String> {
        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let store = match optional("USER_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(format!(
                    "USER_STORE must be postgres or memory, got {other}"
                ))
            }
        };

        Ok(Self {
            listen_addr,
            store,
            cognito: CognitoConfig::from_env()?,
        })
    }
}

fn issuer_for(region: &str, user_pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}")
}

fn required(name: &str) -> Result<String, String> {
    optional(name).ok_or_else(|| format!("{name} environment variable is required"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_url(what: &str, value: &str) -> Result<Url, String> {
    Url::parse(value).map_err(|e| format!("{what} is not a valid URL ({value}): {e}"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
