use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{ProfileError, ProfileUpdate, UserProfile};

/// User record storage.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileError>;

    /// Returns `None` when no record has that id.
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, ProfileError>;

    async fn set_image(&self, user_id: &str, image_url: &str) -> Result<Option<UserProfile>, ProfileError>;
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserProfile>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id.clone(), u)).collect()),
        }
    }

    pub async fn insert(&self, user: UserProfile) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, ProfileError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(user_id) else {
            return Ok(None);
        };

        user.name = update.name.clone();
        user.phone = update.phone.clone();
        user.address = update.address.clone();
        user.dob = update.dob.clone();
        user.gender = update.gender.clone();
        Ok(Some(user.clone()))
    }

    async fn set_image(&self, user_id: &str, image_url: &str) -> Result<Option<UserProfile>, ProfileError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(user_id).map(|user| {
            user.image = Some(image_url.to_string());
            user.clone()
        }))
    }
}
