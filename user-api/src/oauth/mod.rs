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

//! Cognito OAuth2/OIDC helpers: JWT decoding, claim validation, JWKS caching,
//! signature verification, login URL construction, and code exchange.

pub mod claims;
pub mod codec;
pub mod exchange;
pub mod jwks;
pub mod validate;
pub mod verify;

// Re-export public API so callers can use `crate::oauth::*`.
pub use claims::{Claims, TokenUse};
pub use codec::{decode, TokenError};
pub use exchange::{build_login_url, build_logout_url, CodeExchange, CognitoOAuthClient, TokenSet};
pub use jwks::JwksCache;
pub use validate::{ClaimsValidator, RejectReason, TokenCheck, TokenValidator};
pub use verify::{JwksVerifier, SignatureVerifier};
