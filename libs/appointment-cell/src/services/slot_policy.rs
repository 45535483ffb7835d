use chrono::{NaiveDate, NaiveTime};

use shared_config::SlotPolicy;

use crate::models::AppointmentError;

/// Applies the configured slot policy to a (date, time) selection and
/// returns the strings used as calendar keys.
pub fn normalize_slot(
    policy: SlotPolicy,
    slot_date: &str,
    slot_time: &str,
) -> Result<(String, String), AppointmentError> {
    let slot_date = slot_date.trim();
    let slot_time = slot_time.trim();
    if slot_date.is_empty() || slot_time.is_empty() {
        return Err(AppointmentError::MissingSlot);
    }

    match policy {
        SlotPolicy::Lenient => Ok((slot_date.to_string(), slot_time.to_string())),
        SlotPolicy::Strict => {
            let date = parse_date(slot_date).ok_or_else(|| {
                AppointmentError::InvalidSlot(format!("unrecognised date '{}'", slot_date))
            })?;
            let time = parse_time(slot_time).ok_or_else(|| {
                AppointmentError::InvalidSlot(format!("unrecognised time '{}'", slot_time))
            })?;
            Ok((date.format("%Y-%m-%d").to_string(), time.format("%H:%M").to_string()))
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    // Legacy `D_M_YYYY` calendar keys.
    let mut parts = value.split('_').map(|p| p.parse::<u32>().ok());
    let (day, month, year) = (parts.next()??, parts.next()??, parts.next()??);
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&value.to_uppercase(), "%I:%M %p"))
        .ok()
}
