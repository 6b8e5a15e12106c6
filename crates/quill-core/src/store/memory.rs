//! In-memory content store.
//!
//! Reference implementation of [`ContentStore`] used by tests and by the
//! server when no external store is wired up.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::types::{ContentRecord, UserRecord};

use super::ContentStore;

/// An in-memory [`ContentStore`] backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RwLock<HashMap<i64, ContentRecord>>,
    users: RwLock<HashMap<String, UserRecord>>,
    options: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a user record.
    pub async fn insert_user(&self, record: UserRecord) {
        self.users
            .write()
            .await
            .insert(record.username.clone(), record);
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn content(&self, id: i64) -> Result<Option<ContentRecord>, AppError> {
        Ok(self.content.read().await.get(&id).cloned())
    }

    async fn upsert_content(&self, record: ContentRecord) -> Result<(), AppError> {
        self.content.write().await.insert(record.id, record);
        Ok(())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn option_value(&self, name: &str) -> Result<Option<String>, AppError> {
        Ok(self.options.read().await.get(name).cloned())
    }

    async fn set_option(&self, name: &str, value: &str) -> Result<(), AppError> {
        self.options
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentStatus;

    #[tokio::test]
    async fn point_lookups_round_trip() {
        let store = MemoryStore::new();
        store
            .upsert_content(ContentRecord {
                id: 7,
                author_id: 2,
                title: "Hello".to_string(),
                status: ContentStatus::Published,
            })
            .await
            .unwrap();
        store
            .insert_user(UserRecord {
                id: 2,
                username: "vera".to_string(),
                role: "editor".to_string(),
            })
            .await;

        let record = store.content(7).await.unwrap().unwrap();
        assert_eq!(record.author_id, 2);
        assert!(store.content(8).await.unwrap().is_none());

        let user = store.user_by_username("vera").await.unwrap().unwrap();
        assert_eq!(user.role, "editor");

        store.set_option("admin_theme", "zenith").await.unwrap();
        assert_eq!(
            store.option_value("admin_theme").await.unwrap().as_deref(),
            Some("zenith")
        );
        assert!(store.option_value("missing").await.unwrap().is_none());
    }
}
