use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::profile_routes;
use payment_cell::router::payment_routes;
use shared_config::AppConfig;

use crate::state::AppServices;

pub fn create_router(config: Arc<AppConfig>, services: &AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "API is working!" }))
        .nest("/api/doctors", doctor_routes(services.doctors.clone()))
        .nest("/api/user", profile_routes(config.clone(), services.profiles.clone()))
        .nest("/api/appointments", appointment_routes(config.clone(), services.bookings.clone()))
        .nest("/api/payments", payment_routes(config, services.payments.clone()))
}
