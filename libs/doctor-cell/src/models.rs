use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

/// Booked times per calendar date. Each time appears at most once per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotsBooked(BTreeMap<String, Vec<String>>);

impl SlotsBooked {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, slot_date: &str, slot_time: &str) -> bool {
        self.0
            .get(slot_date)
            .is_some_and(|times| times.iter().any(|t| t == slot_time))
    }

    /// Appends the time to the date entry, creating it when absent.
    /// Returns false when the time was already booked.
    pub fn claim(&mut self, slot_date: &str, slot_time: &str) -> bool {
        let times = self.0.entry(slot_date.to_string()).or_default();
        if times.iter().any(|t| t == slot_time) {
            return false;
        }
        times.push(slot_time.to_string());
        true
    }

    /// Removes that single time from the date entry. The date key stays,
    /// possibly empty.
    pub fn release(&mut self, slot_date: &str, slot_time: &str) -> bool {
        match self.0.get_mut(slot_date) {
            Some(times) => {
                let before = times.len();
                times.retain(|t| t != slot_time);
                times.len() != before
            }
            None => false,
        }
    }

    pub fn times(&self, slot_date: &str) -> &[String] {
        self.0.get(slot_date).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl From<BTreeMap<String, Vec<String>>> for SlotsBooked {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub slots_booked: SlotsBooked,
}

/// Doctor data frozen into an appointment at booking time. Carries no
/// calendar: `slots_booked` is live state, not history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    #[serde(default)]
    pub address: Address,
}

impl From<&Doctor> for DoctorSnapshot {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            image: doctor.image.clone(),
            speciality: doctor.speciality.clone(),
            degree: doctor.degree.clone(),
            experience: doctor.experience.clone(),
            about: doctor.about.clone(),
            available: doctor.available,
            fees: doctor.fees,
            address: doctor.address.clone(),
        }
    }
}

/// (doctor, date, time): the unit of mutual exclusion for booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub doc_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
}

impl SlotKey {
    pub fn new(doc_id: Uuid, slot_date: impl Into<String>, slot_time: impl Into<String>) -> Self {
        Self {
            doc_id,
            slot_date: slot_date.into(),
            slot_time: slot_time.into(),
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} {}", self.doc_id, self.slot_date, self.slot_time)
    }
}

/// Outcome of an append-if-absent on a doctor's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotClaim {
    Claimed,
    Taken,
    #[serde(rename = "missing")]
    DoctorMissing,
}

/// Outcome of removing one time from a doctor's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRelease {
    Released,
    NotHeld,
    #[serde(rename = "missing")]
    DoctorMissing,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorListQuery {
    pub speciality: Option<String>,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for DoctorError {
    fn from(err: anyhow::Error) -> Self {
        DoctorError::Storage(err.to_string())
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Storage(detail) => AppError::Upstream(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_append_if_absent() {
        let mut slots = SlotsBooked::new();
        assert!(slots.claim("2024-05-01", "10:00"));
        assert!(slots.claim("2024-05-01", "10:30"));
        assert!(!slots.claim("2024-05-01", "10:00"));
        assert_eq!(slots.times("2024-05-01"), ["10:00", "10:30"]);
    }

    #[test]
    fn release_filters_single_entry_and_keeps_date() {
        let mut slots = SlotsBooked::new();
        slots.claim("2024-05-01", "10:00");
        slots.claim("2024-05-01", "11:00");

        assert!(slots.release("2024-05-01", "10:00"));
        assert!(!slots.release("2024-05-01", "10:00"));
        assert!(!slots.release("2024-05-02", "10:00"));
        assert_eq!(slots.times("2024-05-01"), ["11:00"]);

        slots.release("2024-05-01", "11:00");
        assert_eq!(serde_json::to_value(&slots).unwrap(), serde_json::json!({"2024-05-01": []}));
    }

    #[test]
    fn snapshot_has_no_calendar() {
        let mut slots = SlotsBooked::new();
        slots.claim("2024-05-01", "10:00");
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: "Dr. Richard James".into(),
            email: "richard@example.com".into(),
            image: None,
            speciality: "General physician".into(),
            degree: "MBBS".into(),
            experience: "4 Years".into(),
            about: String::new(),
            available: true,
            fees: 500.0,
            address: Address::default(),
            slots_booked: slots,
        };

        let value = serde_json::to_value(DoctorSnapshot::from(&doctor)).unwrap();
        assert!(value.get("slots_booked").is_none());
        assert_eq!(value["fees"], 500.0);
    }

    #[test]
    fn claim_outcomes_match_storage_function_results() {
        assert_eq!(serde_json::from_str::<SlotClaim>("\"claimed\"").unwrap(), SlotClaim::Claimed);
        assert_eq!(serde_json::from_str::<SlotClaim>("\"taken\"").unwrap(), SlotClaim::Taken);
        assert_eq!(serde_json::from_str::<SlotClaim>("\"missing\"").unwrap(), SlotClaim::DoctorMissing);
        assert_eq!(serde_json::from_str::<SlotRelease>("\"not_held\"").unwrap(), SlotRelease::NotHeld);
    }
}
