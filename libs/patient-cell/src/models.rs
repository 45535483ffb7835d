use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

/// Public view of a user record. Credentials are never selected, so the
/// same shape doubles as the snapshot frozen into appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub dob: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    /// Base64 payload, optionally as a `data:image/...;base64,` url.
    pub image: Option<String>,
}

/// Validated field set written to the user record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: String,
    pub address: Address,
    pub dob: String,
    pub gender: String,
}

impl UpdateProfileRequest {
    /// Splits the request into the record update and the optional image.
    pub fn into_update(self) -> Result<(ProfileUpdate, Option<String>), ProfileError> {
        fn required(value: Option<String>) -> Result<String, ProfileError> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ProfileError::MissingData)
        }

        let update = ProfileUpdate {
            name: required(self.name)?,
            phone: required(self.phone)?,
            dob: required(self.dob)?,
            gender: required(self.gender)?,
            address: self.address.unwrap_or_default(),
        };
        let image = self.image.filter(|i| !i.trim().is_empty());

        Ok((update, image))
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Missing required profile data.")]
    MissingData,

    #[error("User not found")]
    NotFound,

    #[error("User not found or ID is invalid.")]
    UpdateTargetMissing,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Profile storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for ProfileError {
    fn from(err: anyhow::Error) -> Self {
        ProfileError::Storage(err.to_string())
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::MissingData | ProfileError::InvalidImage(_) => {
                AppError::Validation(err.to_string())
            }
            ProfileError::NotFound | ProfileError::UpdateTargetMissing => {
                AppError::NotFound(err.to_string())
            }
            ProfileError::Storage(detail) => AppError::Upstream(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: Some("Avery Patel".into()),
            phone: Some("9876543210".into()),
            address: None,
            dob: Some("1990-04-12".into()),
            gender: Some("Female".into()),
            image: Some("   ".into()),
        }
    }

    #[test]
    fn blank_required_field_is_missing_data() {
        let request = UpdateProfileRequest { phone: Some("  ".into()), ..full_request() };
        assert!(matches!(request.into_update(), Err(ProfileError::MissingData)));
    }

    #[test]
    fn address_defaults_and_blank_image_is_dropped() {
        let (update, image) = full_request().into_update().unwrap();
        assert_eq!(update.address, Address::default());
        assert_eq!(update.name, "Avery Patel");
        assert!(image.is_none());
    }

    #[test]
    fn profile_never_carries_password() {
        let row = serde_json::json!({
            "id": "u1",
            "name": "Avery",
            "email": "avery@example.com",
            "password": "$2b$10$hash"
        });
        let profile: UserProfile = serde_json::from_value(row).unwrap();
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password").is_none());
    }
}
