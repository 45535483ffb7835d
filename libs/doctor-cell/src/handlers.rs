use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{Doctor, DoctorError, DoctorListQuery};
use crate::services::DoctorDirectory;

pub async fn list_doctors(
    State(directory): State<Arc<dyn DoctorDirectory>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<ApiResponse<Vec<Doctor>>>, AppError> {
    let doctors = directory.list(&query).await?;
    Ok(Json(ApiResponse::ok(doctors)))
}

pub async fn get_doctor(
    State(directory): State<Arc<dyn DoctorDirectory>>,
    Path(doc_id): Path<String>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    // A malformed id cannot name a doctor.
    let doc_id = Uuid::parse_str(doc_id.trim()).map_err(|_| DoctorError::NotFound)?;

    let doctor = directory
        .find_by_id(doc_id)
        .await?
        .ok_or(DoctorError::NotFound)?;

    Ok(Json(ApiResponse::ok(doctor)))
}
