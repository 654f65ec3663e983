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

//! `users` table queries.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::identity::UserIdentity;

use super::{IdentityStore, StoreError};

/// Row returned from the `users` table.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub user_name: String,
    pub phone_number: String,
    pub user_location: String,
}

impl From<UserRow> for UserIdentity {
    fn from(row: UserRow) -> Self {
        UserIdentity {
            user_id: row.user_id,
            user_name: row.user_name,
            phone_number: row.phone_number,
            user_location: row.user_location,
        }
    }
}

/// Get a user by id.
pub async fn get_by_id(pool: &PgPool, user_id: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT user_id, user_name, phone_number, user_location FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Get the first user holding a phone number.
pub async fn get_by_phone(
    pool: &PgPool,
    phone_number: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT user_id, user_name, phone_number, user_location
        FROM users
        WHERE phone_number = $1
        ORDER BY user_id
        LIMIT 1
        "#,
    )
    .bind(phone_number)
    .fetch_optional(pool)
    .await
}

/// Insert a user unless `user_id` already exists, then return the stored row.
/// The losing side of a concurrent first login reads the winner's row.
pub async fn insert_if_absent(
    pool: &PgPool,
    user_id: &str,
    user_name: &str,
    phone_number: &str,
    user_location: &str,
) -> Result<UserRow, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, user_name, phone_number, user_location)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(user_name)
    .bind(phone_number)
    .bind(user_location)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, UserRow>(
        "SELECT user_id, user_name, phone_number, user_location FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Update the profile fields of a user. Returns whether a row was touched.
pub async fn update_profile(
    pool: &PgPool,
    user_id: &str,
    user_name: &str,
    phone_number: &str,
    user_location: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET user_name = $2, phone_number = $3, user_location = $4
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(user_name)
    .bind(phone_number)
    .bind(user_location)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Total number of users.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// [`IdentityStore`] over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find(&self, user_id: &str) -> Result<Option<UserIdentity>, StoreError> {
        Ok(get_by_id(&self.pool, user_id).await?.map(Into::into))
    }

    async fn insert_if_absent(&self, identity: UserIdentity) -> Result<UserIdentity, StoreError> {
        let row = insert_if_absent(
            &self.pool,
            &identity.user_id,
            &identity.user_name,
            &identity.phone_number,
            &identity.user_location,
        )
        .await?;
        Ok(row.into())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<UserIdentity>, StoreError> {
        Ok(get_by_phone(&self.pool, phone_number).await?.map(Into::into))
    }

    async fn update(&self, identity: &UserIdentity) -> Result<bool, StoreError> {
        Ok(update_profile(
            &self.pool,
            &identity.user_id,
            &identity.user_name,
            &identity.phone_number,
            &identity.user_location,
        )
        .await?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(count(&self.pool).await?)
    }
}
