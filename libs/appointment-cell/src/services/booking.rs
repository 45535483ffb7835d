use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use doctor_cell::models::{DoctorSnapshot, SlotClaim, SlotKey, SlotRelease};
use doctor_cell::services::DoctorDirectory;
use patient_cell::services::UserDirectory;
use shared_config::SlotPolicy;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, CancelAppointmentRequest, FlagChange,
};
use crate::services::ledger::AppointmentLedger;
use crate::services::slot_lock::SlotLocks;
use crate::services::slot_policy::normalize_slot;

/// Books and cancels doctor slots. A booking holds the slot key's lock from
/// the availability check until the appointment is stored; the directory
/// claim underneath is itself append-if-absent.
pub struct BookingService {
    doctors: Arc<dyn DoctorDirectory>,
    users: Arc<dyn UserDirectory>,
    ledger: Arc<dyn AppointmentLedger>,
    locks: SlotLocks,
    policy: SlotPolicy,
}

impl BookingService {
    pub fn new(
        doctors: Arc<dyn DoctorDirectory>,
        users: Arc<dyn UserDirectory>,
        ledger: Arc<dyn AppointmentLedger>,
        policy: SlotPolicy,
    ) -> Self {
        Self {
            doctors,
            users,
            ledger,
            locks: SlotLocks::new(),
            policy,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn book_appointment(
        &self,
        user_id: &str,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let (Some(doc_id), Some(slot_date), Some(slot_time)) =
            (request.doc_id, request.slot_date, request.slot_time)
        else {
            return Err(AppointmentError::MissingSlot);
        };
        if doc_id.trim().is_empty() {
            return Err(AppointmentError::MissingSlot);
        }
        let (slot_date, slot_time) = normalize_slot(self.policy, &slot_date, &slot_time)?;
        let doc_id = Uuid::parse_str(doc_id.trim()).map_err(|_| AppointmentError::DoctorNotFound)?;

        let key = SlotKey::new(doc_id, slot_date, slot_time);
        let _guard = self.locks.acquire(&key).await;
        debug!("Holding slot lock {}", key);

        let doctor = self.doctors
            .find_by_id(doc_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        if !doctor.available {
            return Err(AppointmentError::DoctorUnavailable);
        }

        if doctor.slots_booked.is_taken(&key.slot_date, &key.slot_time) {
            return Err(AppointmentError::SlotTaken);
        }

        let user_data = self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppointmentError::UserNotFound)?;

        match self.doctors.claim_slot(&key).await? {
            SlotClaim::Claimed => {}
            SlotClaim::Taken => return Err(AppointmentError::SlotTaken),
            SlotClaim::DoctorMissing => return Err(AppointmentError::DoctorNotFound),
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            doc_id,
            slot_date: key.slot_date.clone(),
            slot_time: key.slot_time.clone(),
            user_data,
            doc_data: DoctorSnapshot::from(&doctor),
            amount: doctor.fees,
            created_at: Utc::now(),
            cancelled: false,
            payment: false,
        };

        match self.ledger.create(&appointment).await {
            Ok(stored) => {
                info!("Appointment {} booked on {}", stored.id, key);
                Ok(stored)
            }
            Err(e) => {
                // The slot was claimed for an appointment that never got stored.
                if let Err(release_err) = self.doctors.release_slot(&key).await {
                    error!("Failed to release {} after ledger error: {}", key, release_err);
                }
                Err(e)
            }
        }
    }

    #[instrument(skip(self, request))]
    pub async fn cancel_appointment(
        &self,
        user_id: &str,
        request: CancelAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let appointment_id = request
            .appointment_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(AppointmentError::MissingAppointmentId)?;
        let appointment_id = Uuid::parse_str(&appointment_id).map_err(|_| AppointmentError::NotFound)?;

        let appointment = self.ledger
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if !appointment.is_owned_by(user_id) {
            warn!("User {} tried to cancel appointment {} of another user", user_id, appointment.id);
            return Err(AppointmentError::OwnerMismatch);
        }

        let key = appointment.slot_key();
        let _guard = self.locks.acquire(&key).await;

        let cancelled = match self.ledger.mark_cancelled(appointment.id).await? {
            FlagChange::Flipped(cancelled) => cancelled,
            FlagChange::AlreadySet(cancelled) => {
                debug!("Appointment {} was already cancelled", cancelled.id);
                return Ok(cancelled);
            }
            FlagChange::Missing => return Err(AppointmentError::NotFound),
        };

        match self.doctors.release_slot(&key).await {
            Ok(SlotRelease::Released) => info!("Released {} for cancelled appointment {}", key, cancelled.id),
            Ok(SlotRelease::NotHeld) => debug!("Slot {} was not held", key),
            Ok(SlotRelease::DoctorMissing) => warn!("Doctor {} no longer exists, slot not released", key.doc_id),
            Err(e) => warn!("Failed to release {} for appointment {}: {}", key, cancelled.id, e),
        }

        Ok(cancelled)
    }

    pub async fn list_appointments(&self, user_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        self.ledger.find_by_user(user_id).await
    }
}
