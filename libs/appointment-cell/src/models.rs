use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::{DoctorError, DoctorSnapshot, SlotKey};
use patient_cell::models::{ProfileError, UserProfile};
use shared_models::error::AppError;

/// Ledger record of a booking. `cancelled` and `payment` only ever move
/// from false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: String,
    pub doc_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: UserProfile,
    pub doc_data: DoctorSnapshot,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub payment: bool,
}

impl Appointment {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.doc_id, self.slot_date.clone(), self.slot_time.clone())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Result of a conditional false→true flag update in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagChange {
    /// This call moved the flag.
    Flipped(Appointment),
    /// The flag was already set; nothing was written.
    AlreadySet(Appointment),
    Missing,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doc_id: Option<String>,
    pub slot_date: Option<String>,
    pub slot_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    pub appointment_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Slot required. Please select a date and time before booking.")]
    MissingSlot,

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor not available")]
    DoctorUnavailable,

    #[error("Slot not available")]
    SlotTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Missing appointment ID")]
    MissingAppointmentId,

    #[error("Appointment not found")]
    NotFound,

    #[error("Unauthorized action: User ID mismatch")]
    OwnerMismatch,

    #[error("Appointment storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        AppointmentError::Storage(err.to_string())
    }
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppointmentError::DoctorNotFound,
            DoctorError::Storage(detail) => AppointmentError::Storage(detail),
        }
    }
}

impl From<ProfileError> for AppointmentError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound | ProfileError::UpdateTargetMissing => AppointmentError::UserNotFound,
            other => AppointmentError::Storage(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::MissingSlot
            | AppointmentError::InvalidSlot(_)
            | AppointmentError::MissingAppointmentId => AppError::Validation(err.to_string()),
            AppointmentError::DoctorNotFound
            | AppointmentError::UserNotFound
            | AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorUnavailable
            | AppointmentError::SlotTaken => AppError::Conflict(err.to_string()),
            AppointmentError::OwnerMismatch => AppError::Forbidden(err.to_string()),
            AppointmentError::Storage(detail) => AppError::Upstream(detail),
        }
    }
}
