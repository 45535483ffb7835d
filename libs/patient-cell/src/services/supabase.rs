use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use crate::models::{ProfileError, ProfileUpdate, UserProfile};
use crate::services::directory::UserDirectory;

const PROFILE_COLUMNS: &str = "id,name,email,image,phone,address,gender,dob";

/// `users` table over PostgREST. Only profile columns are ever selected.
pub struct SupabaseUserDirectory {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseUserDirectory {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn user_path(user_id: &str) -> String {
        format!(
            "/rest/v1/users?id=eq.{}&select={}",
            urlencoding::encode(user_id),
            PROFILE_COLUMNS
        )
    }

    fn first_profile(rows: Vec<Value>) -> Result<Option<UserProfile>, ProfileError> {
        rows.into_iter()
            .next()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| ProfileError::Storage(format!("Failed to parse user: {}", e)))
            })
            .transpose()
    }

    async fn patch(&self, user_id: &str, body: Value) -> Result<Option<UserProfile>, ProfileError> {
        let rows: Vec<Value> = self.supabase.request_returning(
            Method::PATCH,
            &Self::user_path(user_id),
            None,
            Some(body),
        ).await?;

        Self::first_profile(rows)
    }
}

#[async_trait]
impl UserDirectory for SupabaseUserDirectory {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileError> {
        debug!("Fetching user profile: {}", user_id);

        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &Self::user_path(user_id),
            None,
            None,
        ).await?;

        Self::first_profile(rows)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, ProfileError> {
        let body = serde_json::to_value(update)
            .map_err(|e| ProfileError::Storage(e.to_string()))?;
        self.patch(user_id, body).await
    }

    async fn set_image(&self, user_id: &str, image_url: &str) -> Result<Option<UserProfile>, ProfileError> {
        self.patch(user_id, json!({ "image": image_url })).await
    }
}
