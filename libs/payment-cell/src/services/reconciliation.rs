use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use appointment_cell::models::{Appointment, AppointmentError, FlagChange};
use appointment_cell::services::AppointmentLedger;

use crate::models::{CreateOrder, GatewayOrder, PaymentError};
use crate::services::gateway::PaymentGateway;

/// Ties gateway orders to appointments. The order receipt carries the
/// appointment id; `payment` is only set once the gateway says "paid".
pub struct PaymentService {
    ledger: Arc<dyn AppointmentLedger>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentService {
    pub fn new(
        ledger: Arc<dyn AppointmentLedger>,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            gateway,
            currency: currency.into(),
        }
    }

    /// Only the booker may open an order for an appointment.
    #[instrument(skip(self))]
    pub async fn create_payment_order(
        &self,
        user_id: &str,
        appointment_id: Option<&str>,
    ) -> Result<GatewayOrder, PaymentError> {
        let appointment = match appointment_id.map(str::trim).and_then(|id| Uuid::parse_str(id).ok()) {
            Some(id) => self.ledger.find_by_id(id).await?,
            None => None,
        };

        let appointment = appointment
            .filter(|a| !a.cancelled)
            .ok_or(PaymentError::AppointmentUnavailable)?;

        if !appointment.is_owned_by(user_id) {
            warn!("User {} tried to pay for appointment {} owned by {}", user_id, appointment.id, appointment.user_id);
            return Err(AppointmentError::OwnerMismatch.into());
        }

        let order = CreateOrder {
            amount: to_minor_units(appointment.amount),
            currency: self.currency.clone(),
            receipt: appointment.id.to_string(),
        };

        self.gateway.create_order(order).await
    }

    #[instrument(skip(self))]
    pub async fn verify_payment(&self, order_id: Option<&str>) -> Result<Appointment, PaymentError> {
        let order_id = order_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(PaymentError::MissingOrderId)?;

        let order = self.gateway.fetch_order(order_id).await?;
        if !order.is_paid() {
            info!("Order {} is {}, appointment left unpaid", order.id, order.status);
            return Err(PaymentError::NotPaid);
        }

        let appointment_id = order
            .receipt
            .as_deref()
            .and_then(|receipt| Uuid::parse_str(receipt).ok())
            .ok_or_else(|| {
                error!("Paid order {} has no usable receipt: {:?}", order.id, order.receipt);
                PaymentError::ReceiptUnmatched
            })?;

        match self.ledger.mark_paid(appointment_id).await? {
            FlagChange::Flipped(appointment) => {
                info!("Appointment {} paid via order {}", appointment.id, order.id);
                Ok(appointment)
            }
            FlagChange::AlreadySet(appointment) => Ok(appointment),
            FlagChange::Missing => {
                warn!("Paid order {} references missing appointment {}", order.id, appointment_id);
                Err(PaymentError::ReceiptUnmatched)
            }
        }
    }
}

/// Amount in the currency's smallest unit (paise for INR).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_float_noise() {
        assert_eq!(to_minor_units(500.0), 50000);
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(0.29), 29);
    }
}
