use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{UpdateProfileRequest, UserProfile};
use crate::services::ProfileService;

#[axum::debug_handler]
pub async fn get_profile(
    State(service): State<Arc<ProfileService>>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let profile = service.get_profile(&user.id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(service): State<Arc<ProfileService>>,
    Extension(user): Extension<User>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let profile = service.update_profile(&user.id, request).await?;
    Ok(Json(ApiResponse::ok_with_message("Profile Updated successfully.", profile)))
}
