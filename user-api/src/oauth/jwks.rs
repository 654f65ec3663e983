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

//! JWKS (JSON Web Key Set) cache for the user pool signing keys, with
//! rate-limited refresh.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use super::codec::TokenError;

/// Minimum interval between JWKS refreshes (5 minutes).
const JWKS_REFRESH_INTERVAL_SECS: u64 = 300;

/// A JWK entry from the JWKS endpoint. Cognito publishes RSA keys only.
#[derive(Debug, Deserialize)]
struct JwkEntry {
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    alg: Option<String>,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkEntry>,
}

/// Caches RS256 verification keys by `kid`.
pub struct JwksCache {
    keys: RwLock<HashMap<String, DecodingKey>>,
    jwks_url: Option<Url>,
    http: reqwest::Client,
    /// `None` until the first fetch.
    last_refresh: RwLock<Option<Instant>>,
}

impl JwksCache {
    pub fn new(jwks_url: Url, http: reqwest::Client) -> Arc<Self> {
        Arc::new(Self {
            keys: RwLock::new(HashMap::new()),
            jwks_url: Some(jwks_url),
            http,
            last_refresh: RwLock::new(None),
        })
    }

    /// A cache with pre-loaded keys that never fetches.
    pub fn with_keys(keys: HashMap<String, DecodingKey>) -> Arc<Self> {
        Arc::new(Self {
            keys: RwLock::new(keys),
            jwks_url: None,
            http: reqwest::Client::new(),
            last_refresh: RwLock::new(Some(Instant::now())),
        })
    }

    /// Get the decoding key for a given `kid`. Refreshes the cache if the key
    /// is not found (rate-limited to once per 5 minutes).
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, TokenError> {
        {
            let keys = self.keys.read().await;
            if let Some(key) = keys.get(kid) {
                return Ok(key.clone());
            }
        }

        self.refresh().await?;

        let keys = self.keys.read().await;
        keys.get(kid)
            .cloned()
            .ok_or_else(|| TokenError::Signature(format!("JWKS key not found for kid: {kid}")))
    }

    /// Fetch the JWKS document and replace the cache. Rate-limited.
    async fn refresh(&self) -> Result<(), TokenError> {
        let Some(jwks_url) = &self.jwks_url else {
            return Ok(());
        };
        {
            let last = *self.last_refresh.read().await;
            if last.is_some_and(|at| at.elapsed().as_secs() < JWKS_REFRESH_INTERVAL_SECS) {
                return Ok(());
            }
        }

        tracing::debug!("Fetching JWKS from {jwks_url}");
        let resp = self
            .http
            .get(jwks_url.clone())
            .send()
            .await
            .map_err(|e| TokenError::Signature(format!("JWKS fetch failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(TokenError::Signature(format!(
                "JWKS fetch returned HTTP {status}"
            )));
        }

        let doc: JwksDocument = resp
            .json()
            .await
            .map_err(|e| TokenError::Signature(format!("Failed to parse JWKS: {e}")))?;

        let mut new_keys = HashMap::new();
        for jwk in &doc.keys {
            let Some(kid) = &jwk.kid else { continue };
            if jwk.kty != "RSA" || jwk.alg.as_deref().is_some_and(|alg| alg != "RS256") {
                tracing::debug!("Skipping non-RS256 JWK {kid}");
                continue;
            }
            let n = jwk.n.as_deref().unwrap_or_default();
            let e = jwk.e.as_deref().unwrap_or_default();
            if n.is_empty() || e.is_empty() {
                continue;
            }
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    new_keys.insert(kid.clone(), key);
                }
                Err(err) => tracing::warn!("Ignoring invalid RSA JWK {kid}: {err}"),
            }
        }

        tracing::info!("Loaded {} signing keys from JWKS", new_keys.len());
        *self.keys.write().await = new_keys;
        *self.last_refresh.write().await = Some(Instant::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    // RSA public key from the RFC 7517 examples.
    const N: &str = concat!(
        "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM",
        "9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qT",
        "RsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA8",
        "4-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWF",
        "LU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw",
    );
    const E: &str = "AQAB";

    #[tokio::test]
    async fn first_lookup_fetches_and_caches_rs256_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keys": [
                    {"kid": "rsa-1", "kty": "RSA", "alg": "RS256", "n": N, "e": E},
                    {"kid": "ec-1", "kty": "EC", "crv": "P-256", "x": "x", "y": "y"},
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/jwks.json", server.uri())).unwrap();
        let cache = JwksCache::new(url, reqwest::Client::new());

        assert!(cache.get_key("rsa-1").await.is_ok());
        assert!(cache.get_key("rsa-1").await.is_ok());
        // A miss right after a fetch is rate limited and does not refetch.
        assert!(matches!(
            cache.get_key("ec-1").await,
            Err(TokenError::Signature(_))
        ));
    }

    #[tokio::test]
    async fn preloaded_cache_never_fetches() {
        let cache = JwksCache::with_keys(HashMap::new());
        let err = cache.get_key("missing").await.err();
        assert!(matches!(err, Some(TokenError::Signature(ref m)) if m.contains("missing")));
    }
}
