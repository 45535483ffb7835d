use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, FlagChange};

/// System of record for appointments.
#[async_trait]
pub trait AppointmentLedger: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppointmentError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError>;

    /// Every appointment of the user, in storage order.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppointmentError>;

    async fn mark_cancelled(&self, id: Uuid) -> Result<FlagChange, AppointmentError>;

    async fn mark_paid(&self, id: Uuid) -> Result<FlagChange, AppointmentError>;
}

#[derive(Default)]
pub struct InMemoryAppointmentLedger {
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    async fn set_flag(
        &self,
        id: Uuid,
        flag: impl FnOnce(&mut Appointment) -> &mut bool,
    ) -> Result<FlagChange, AppointmentError> {
        let mut appointments = self.appointments.write().await;
        let Some(appointment) = appointments.iter_mut().find(|a| a.id == id) else {
            return Ok(FlagChange::Missing);
        };

        let value = flag(&mut *appointment);
        if *value {
            return Ok(FlagChange::AlreadySet(appointment.clone()));
        }
        *value = true;
        Ok(FlagChange::Flipped(appointment.clone()))
    }
}

#[async_trait]
impl AppointmentLedger for InMemoryAppointmentLedger {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.appointments.write().await;
        if appointments.iter().any(|a| a.id == appointment.id) {
            return Err(AppointmentError::Storage(format!(
                "duplicate appointment id {}",
                appointment.id
            )));
        }
        appointments.push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .iter()
            .filter(|a| a.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn mark_cancelled(&self, id: Uuid) -> Result<FlagChange, AppointmentError> {
        self.set_flag(id, |a| &mut a.cancelled).await
    }

    async fn mark_paid(&self, id: Uuid) -> Result<FlagChange, AppointmentError> {
        self.set_flag(id, |a| &mut a.payment).await
    }
}
