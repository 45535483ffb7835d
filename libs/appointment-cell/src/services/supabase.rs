use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentError, FlagChange};
use crate::services::ledger::AppointmentLedger;

/// `appointments` table over PostgREST. Flag updates are conditional on the
/// flag still being false, so concurrent writers cannot both flip it.
pub struct SupabaseAppointmentLedger {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentLedger {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, AppointmentError> {
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    AppointmentError::Storage(format!("Failed to parse appointment: {}", e))
                })
            })
            .collect()
    }

    async fn set_flag(&self, id: Uuid, flag: &str) -> Result<FlagChange, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}&{}=is.false", id, flag);
        let rows: Vec<Value> = self.supabase.request_returning(
            Method::PATCH,
            &path,
            None,
            Some(json!({ flag: true })),
        ).await?;

        if let Some(updated) = Self::parse_rows(rows)?.into_iter().next() {
            debug!("Set {} on appointment {}", flag, id);
            return Ok(FlagChange::Flipped(updated));
        }

        Ok(match self.find_by_id(id).await? {
            Some(existing) => FlagChange::AlreadySet(existing),
            None => FlagChange::Missing,
        })
    }
}

#[async_trait]
impl AppointmentLedger for SupabaseAppointmentLedger {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppointmentError> {
        let body = serde_json::to_value(appointment)
            .map_err(|e| AppointmentError::Storage(e.to_string()))?;

        let rows: Vec<Value> = self.supabase.request_returning(
            Method::POST,
            "/rest/v1/appointments",
            None,
            Some(body),
        ).await?;

        Self::parse_rows(rows)?.into_iter().next().ok_or_else(|| {
            error!("Insert of appointment {} returned no row", appointment.id);
            AppointmentError::Storage("Failed to create appointment".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None, None).await?;
        Ok(Self::parse_rows(rows)?.into_iter().next())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&order=created_at.asc",
            urlencoding::encode(user_id)
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None, None).await?;
        Self::parse_rows(rows)
    }

    async fn mark_cancelled(&self, id: Uuid) -> Result<FlagChange, AppointmentError> {
        self.set_flag(id, "cancelled").await
    }

    async fn mark_paid(&self, id: Uuid) -> Result<FlagChange, AppointmentError> {
        self.set_flag(id, "payment").await
    }
}
