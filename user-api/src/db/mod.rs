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

//! User record storage.
//!
//! [`IdentityStore`] is the seam between identity resolution and persistence.
//! [`users::PgIdentityStore`] backs production; [`memory::MemoryIdentityStore`]
//! backs tests and `USER_STORE=memory` runs.

pub mod memory;
pub mod users;

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::UserIdentity;

pub use memory::MemoryIdentityStore;
pub use users::PgIdentityStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Keyed by `user_id` (the provider `sub`). Records are never deleted.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find(&self, user_id: &str) -> Result<Option<UserIdentity>, StoreError>;

    /// Insert `identity` unless a record with the same `user_id` exists.
    ///
    /// Atomic: concurrent callers for one `user_id` all get back the single
    /// stored record.
    async fn insert_if_absent(&self, identity: UserIdentity) -> Result<UserIdentity, StoreError>;

    /// Any user holding `phone_number`.
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<UserIdentity>, StoreError>;

    /// Overwrite the mutable fields. `false` when no such user exists.
    async fn update(&self, identity: &UserIdentity) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
