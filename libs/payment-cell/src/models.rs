use serde::{Deserialize, Serialize};
use thiserror::Error;

use appointment_cell::models::AppointmentError;
use shared_models::error::AppError;

/// Order creation parameters. `amount` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Order as the gateway reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub created_at: i64,
}

impl GatewayOrder {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderRequest {
    pub appointment_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Appointment Cancelled or not found")]
    AppointmentUnavailable,

    #[error("Missing order ID")]
    MissingOrderId,

    #[error("Payment Failed")]
    NotPaid,

    #[error("Appointment not found")]
    ReceiptUnmatched,

    #[error("Payment gateway is not configured")]
    NotConfigured,

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error(transparent)]
    Ledger(#[from] AppointmentError),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Gateway(err.to_string())
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::AppointmentUnavailable | PaymentError::NotPaid => {
                AppError::Conflict(err.to_string())
            }
            PaymentError::MissingOrderId => AppError::Validation(err.to_string()),
            PaymentError::ReceiptUnmatched => AppError::NotFound(err.to_string()),
            PaymentError::NotConfigured | PaymentError::Gateway(_) => AppError::Upstream(err.to_string()),
            PaymentError::Ledger(inner) => inner.into(),
        }
    }
}
