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

//! Local user records derived from token claims.

use std::sync::Arc;

use user_types::responses::UserProfile;

use crate::db::IdentityStore;
use crate::error::AuthError;
use crate::oauth::Claims;
use crate::phone;

/// Display name used when the provider supplies none.
pub const DEFAULT_USER_NAME: &str = "사용자";

/// Placeholder for an absent phone number or location.
pub const UNKNOWN: &str = "정보 없음";

/// A locally stored user, keyed by the provider `sub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub user_name: String,
    /// Canonical international form, or [`UNKNOWN`].
    pub phone_number: String,
    pub user_location: String,
}

impl UserIdentity {
    /// Build the record a first login would create from `claims`.
    ///
    /// Returns `None` when the token carries no `sub`.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let user_id = claims.sub()?.to_string();
        let user_name = claims.name().unwrap_or(DEFAULT_USER_NAME).to_string();
        let phone_number = claims
            .phone_number()
            .map(phone::normalize)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let user_location = claims.address_formatted().unwrap_or(UNKNOWN).to_string();

        Some(Self {
            user_id,
            user_name,
            phone_number,
            user_location,
        })
    }

    pub fn has_phone_number(&self) -> bool {
        self.phone_number != UNKNOWN
    }

    pub fn to_profile(&self) -> UserProfile {
        let phone_display = if self.has_phone_number() {
            phone::to_display_form(&self.phone_number)
        } else {
            UNKNOWN.to_string()
        };
        UserProfile {
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            phone_number: self.phone_number.clone(),
            phone_display,
            user_location: self.user_location.clone(),
        }
    }
}

/// Maps validated claims to a local user, creating it on first sight.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Return the user for `claims.sub`, provisioning it if absent.
    ///
    /// An existing record is returned unchanged; claims never overwrite it.
    pub async fn resolve_or_provision(&self, claims: &Claims) -> Result<UserIdentity, AuthError> {
        let Some(sub) = claims.sub() else {
            tracing::warn!("Token has no sub claim; cannot resolve a user");
            return Err(AuthError::MissingSubject);
        };

        if let Some(existing) = self.store.find(sub).await? {
            tracing::debug!("Resolved existing user {sub}");
            return Ok(existing);
        }

        let candidate = UserIdentity::from_claims(claims).ok_or(AuthError::MissingSubject)?;
        let stored = self.store.insert_if_absent(candidate).await?;
        tracing::info!("Provisioned user {} on first login", stored.user_id);
        Ok(stored)
    }

    pub async fn find(&self, user_id: &str) -> Result<Option<UserIdentity>, AuthError> {
        Ok(self.store.find(user_id).await?)
    }
}
