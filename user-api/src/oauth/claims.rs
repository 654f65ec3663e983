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

//! Decoded token claims with defensive typed accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cognito `token_use` claim values this service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUse {
    Id,
    Access,
}

impl TokenUse {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(TokenUse::Id),
            "access" => Some(TokenUse::Access),
            _ => None,
        }
    }
}

/// The JSON payload of a JWT.
///
/// Accessors never fail: a claim holding a value of an unexpected type reads
/// as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A string claim; `None` if absent or not a string.
    pub fn str_claim(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Stable external identity.
    pub fn sub(&self) -> Option<&str> {
        self.str_claim("sub")
    }

    pub fn token_use(&self) -> Option<TokenUse> {
        self.str_claim("token_use").and_then(TokenUse::parse)
    }

    pub fn iss(&self) -> Option<&str> {
        self.str_claim("iss")
    }

    /// `aud` as a list of raw values, `None` when the claim is absent.
    ///
    /// A non-array value (normally a single string) is a one-element list.
    /// Entries are not type-filtered, so the first element is the token's own.
    pub fn audiences(&self) -> Option<Vec<&Value>> {
        match self.0.get("aud")? {
            Value::Array(items) => Some(items.iter().collect()),
            other => Some(vec![other]),
        }
    }

    /// Expiry as unix seconds. Fractional values are truncated.
    pub fn exp(&self) -> Option<i64> {
        let exp = self.0.get("exp")?;
        exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
    }

    pub fn name(&self) -> Option<&str> {
        self.str_claim("name")
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.str_claim("phone_number")
    }

    /// `address.formatted`, only when `address` is an object and `formatted`
    /// is a string.
    pub fn address_formatted(&self) -> Option<&str> {
        self.0
            .get("address")
            .and_then(Value::as_object)
            .and_then(|address| address.get("formatted"))
            .and_then(Value::as_str)
    }
}
