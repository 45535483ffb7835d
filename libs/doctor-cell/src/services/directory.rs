use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Doctor, DoctorError, DoctorListQuery, SlotClaim, SlotKey, SlotRelease};

/// Doctor Directory storage. `claim_slot` and `release_slot` are single
/// atomic storage operations; callers never write a whole calendar back.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn find_by_id(&self, doc_id: Uuid) -> Result<Option<Doctor>, DoctorError>;

    async fn list(&self, query: &DoctorListQuery) -> Result<Vec<Doctor>, DoctorError>;

    /// Add `slot_time` under `slot_date` only if it is not already there.
    async fn claim_slot(&self, key: &SlotKey) -> Result<SlotClaim, DoctorError>;

    /// Remove that one `slot_time` from `slot_date`, leaving other times intact.
    async fn release_slot(&self, key: &SlotKey) -> Result<SlotRelease, DoctorError>;
}

/// Process-local directory. Each claim/release runs under one write guard.
#[derive(Default)]
pub struct InMemoryDoctorDirectory {
    doctors: RwLock<Vec<Doctor>>,
}

impl InMemoryDoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(doctors: Vec<Doctor>) -> Self {
        Self {
            doctors: RwLock::new(doctors),
        }
    }

    pub async fn insert(&self, doctor: Doctor) {
        let mut doctors = self.doctors.write().await;
        doctors.retain(|d| d.id != doctor.id);
        doctors.push(doctor);
    }

    pub async fn remove(&self, doc_id: Uuid) -> Option<Doctor> {
        let mut doctors = self.doctors.write().await;
        let index = doctors.iter().position(|d| d.id == doc_id)?;
        Some(doctors.remove(index))
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn find_by_id(&self, doc_id: Uuid) -> Result<Option<Doctor>, DoctorError> {
        let doctors = self.doctors.read().await;
        Ok(doctors.iter().find(|d| d.id == doc_id).cloned())
    }

    async fn list(&self, query: &DoctorListQuery) -> Result<Vec<Doctor>, DoctorError> {
        let doctors = self.doctors.read().await;
        Ok(doctors
            .iter()
            .filter(|d| match &query.speciality {
                Some(speciality) => d.speciality.eq_ignore_ascii_case(speciality),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn claim_slot(&self, key: &SlotKey) -> Result<SlotClaim, DoctorError> {
        let mut doctors = self.doctors.write().await;
        let Some(doctor) = doctors.iter_mut().find(|d| d.id == key.doc_id) else {
            return Ok(SlotClaim::DoctorMissing);
        };

        let outcome = if doctor.slots_booked.claim(&key.slot_date, &key.slot_time) {
            SlotClaim::Claimed
        } else {
            SlotClaim::Taken
        };
        debug!("Claim on {}: {:?}", key, outcome);
        Ok(outcome)
    }

    async fn release_slot(&self, key: &SlotKey) -> Result<SlotRelease, DoctorError> {
        let mut doctors = self.doctors.write().await;
        let Some(doctor) = doctors.iter_mut().find(|d| d.id == key.doc_id) else {
            return Ok(SlotRelease::DoctorMissing);
        };

        let outcome = if doctor.slots_booked.release(&key.slot_date, &key.slot_time) {
            SlotRelease::Released
        } else {
            SlotRelease::NotHeld
        };
        debug!("Release on {}: {:?}", key, outcome);
        Ok(outcome)
    }
}
