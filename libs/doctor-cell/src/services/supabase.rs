use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, DoctorError, DoctorListQuery, SlotClaim, SlotKey, SlotRelease};
use crate::services::directory::DoctorDirectory;

/// `doctors` table over PostgREST. Slot claims go through the
/// `claim_doctor_slot` / `release_doctor_slot` database functions, which
/// update `slots_booked` in a single conditional statement.
pub struct SupabaseDoctorDirectory {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDoctorDirectory {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn slot_args(key: &SlotKey) -> Value {
        json!({
            "p_doctor_id": key.doc_id,
            "p_slot_date": key.slot_date,
            "p_slot_time": key.slot_time,
        })
    }
}

#[async_trait]
impl DoctorDirectory for SupabaseDoctorDirectory {
    async fn find_by_id(&self, doc_id: Uuid) -> Result<Option<Doctor>, DoctorError> {
        debug!("Fetching doctor: {}", doc_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doc_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        match result.into_iter().next() {
            Some(row) => {
                let doctor: Doctor = serde_json::from_value(row)
                    .map_err(|e| DoctorError::Storage(format!("Failed to parse doctor: {}", e)))?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, query: &DoctorListQuery) -> Result<Vec<Doctor>, DoctorError> {
        let mut path = "/rest/v1/doctors?order=name.asc".to_string();
        if let Some(speciality) = &query.speciality {
            path.push_str(&format!("&speciality=eq.{}", urlencoding::encode(speciality)));
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        result
            .into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| DoctorError::Storage(format!("Failed to parse doctor: {}", e)))
            })
            .collect()
    }

    async fn claim_slot(&self, key: &SlotKey) -> Result<SlotClaim, DoctorError> {
        let outcome: SlotClaim = self.supabase
            .rpc("claim_doctor_slot", Self::slot_args(key), None)
            .await?;

        info!("Slot claim {}: {:?}", key, outcome);
        Ok(outcome)
    }

    async fn release_slot(&self, key: &SlotKey) -> Result<SlotRelease, DoctorError> {
        let outcome: SlotRelease = self.supabase
            .rpc("release_doctor_slot", Self::slot_args(key), None)
            .await?;

        info!("Slot release {}: {:?}", key, outcome);
        Ok(outcome)
    }
}
