use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::models::{ProfileError, UpdateProfileRequest, UserProfile};
use crate::services::blob::BlobStore;
use crate::services::directory::UserDirectory;

pub struct ProfileService {
    users: Arc<dyn UserDirectory>,
    blobs: Arc<dyn BlobStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserDirectory>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { users, blobs }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, ProfileError> {
        debug!("Loading profile for {}", user_id);
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// The whole request, image included, is validated before anything is
    /// written. The image is uploaded only once the user is known to exist.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ProfileError> {
        let (update, image) = request.into_update()?;
        let image = image.as_deref().map(decode_image).transpose()?;

        let mut profile = self.users
            .update_profile(user_id, &update)
            .await?
            .ok_or(ProfileError::UpdateTargetMissing)?;

        if let Some((bytes, content_type, extension)) = image {
            let key = format!("avatars/{}/{}.{}", user_id, Uuid::new_v4(), extension);
            let url = self.blobs.upload(&key, bytes, content_type).await?;

            profile = self.users
                .set_image(user_id, &url)
                .await?
                .ok_or(ProfileError::UpdateTargetMissing)?;
            info!("Stored profile image for {} at {}", user_id, url);
        }

        Ok(profile)
    }
}

/// Accepts raw base64 or a `data:image/<kind>;base64,<payload>` url.
pub fn decode_image(image: &str) -> Result<(Vec<u8>, &'static str, &'static str), ProfileError> {
    let (header, payload) = match image.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => (header, payload),
        _ => ("", image),
    };

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| ProfileError::InvalidImage(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ProfileError::InvalidImage("empty image".to_string()));
    }

    let (content_type, extension) = if header.contains("image/jpeg") || header.contains("image/jpg") {
        ("image/jpeg", "jpg")
    } else if header.contains("image/webp") {
        ("image/webp", "webp")
    } else {
        ("image/png", "png")
    };

    Ok((bytes, content_type, extension))
}
