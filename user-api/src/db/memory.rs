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

//! Process-local identity store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::UserIdentity;

use super::{IdentityStore, StoreError};

#[derive(Default)]
pub struct MemoryIdentityStore {
    users: RwLock<HashMap<String, UserIdentity>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find(&self, user_id: &str) -> Result<Option<UserIdentity>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn insert_if_absent(&self, identity: UserIdentity) -> Result<UserIdentity, StoreError> {
        let mut users = self.users.write().await;
        let stored = users
            .entry(identity.user_id.clone())
            .or_insert(identity)
            .clone();
        Ok(stored)
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<UserIdentity>, StoreError> {
        let users = self.users.read().await;
        let mut holders: Vec<&UserIdentity> = users
            .values()
            .filter(|u| u.phone_number == phone_number)
            .collect();
        holders.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(holders.first().map(|u| (*u).clone()))
    }

    async fn update(&self, identity: &UserIdentity) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&identity.user_id) {
            Some(existing) => {
                *existing = identity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn identity(id: &str, name: &str, phone: &str) -> UserIdentity {
        UserIdentity {
            user_id: id.to_string(),
            user_name: name.to_string(),
            phone_number: phone.to_string(),
            user_location: "서울".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_record() {
        let store = MemoryIdentityStore::new();
        let first = store
            .insert_if_absent(identity("u1", "첫번째", "+82 10 1111 2222"))
            .await
            .unwrap();
        let second = store
            .insert_if_absent(identity("u1", "두번째", "+82 10 3333 4444"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.user_name, "첫번째");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_store_one_record() {
        let store = Arc::new(MemoryIdentityStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_if_absent(identity("same-sub", &format!("name-{i}"), "p"))
                    .await
                    .unwrap()
            }));
        }

        let mut results = Vec::new();
        for h in handles {
            results.push(h.await.unwrap());
        }
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn update_and_lookup_by_phone() {
        let store = MemoryIdentityStore::new();
        store
            .insert_if_absent(identity("u1", "a", "+82 10 1111 2222"))
            .await
            .unwrap();

        let mut changed = identity("u1", "b", "+82 10 9999 8888");
        assert!(store.update(&changed).await.unwrap());
        assert_eq!(
            store.find_by_phone("+82 10 9999 8888").await.unwrap().unwrap().user_id,
            "u1"
        );
        assert!(store.find_by_phone("+82 10 1111 2222").await.unwrap().is_none());

        changed.user_id = "ghost".to_string();
        assert!(!store.update(&changed).await.unwrap());
        assert!(store.find("ghost").await.unwrap().is_none());
    }
}
