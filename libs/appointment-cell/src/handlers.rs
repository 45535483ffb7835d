use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{Appointment, BookAppointmentRequest, CancelAppointmentRequest};
use crate::services::BookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<BookingService>>,
    Extension(user): Extension<User>,
    payload: Result<Json<BookAppointmentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let appointment = service.book_appointment(&user.id, request).await?;
    Ok(Json(ApiResponse::ok_with_message("Appointment Booked", appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<BookingService>>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, AppError> {
    let appointments = service.list_appointments(&user.id).await?;
    Ok(Json(ApiResponse::ok(appointments)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(service): State<Arc<BookingService>>,
    Extension(user): Extension<User>,
    payload: Result<Json<CancelAppointmentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let appointment = service.cancel_appointment(&user.id, request).await?;
    Ok(Json(ApiResponse::ok_with_message("Appointment Cancelled", appointment)))
}
