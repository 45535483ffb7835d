use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use appointment_cell::models::Appointment;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{GatewayOrder, PaymentOrderRequest, VerifyPaymentRequest};
use crate::services::PaymentService;

#[axum::debug_handler]
pub async fn create_payment_order(
    State(service): State<Arc<PaymentService>>,
    Extension(user): Extension<User>,
    payload: Result<Json<PaymentOrderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GatewayOrder>>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let order = service.create_payment_order(&user.id, request.appointment_id.as_deref()).await?;
    Ok(Json(ApiResponse::ok(order)))
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(service): State<Arc<PaymentService>>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let appointment = service.verify_payment(request.razorpay_order_id.as_deref()).await?;
    Ok(Json(ApiResponse::ok_with_message("Payment Successful", appointment)))
}
