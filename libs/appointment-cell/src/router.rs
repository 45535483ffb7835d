use std::sync::Arc;

use axum::{middleware, routing::{get, post}, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{book_appointment, cancel_appointment, list_appointments};
use crate::services::BookingService;

pub fn appointment_routes(config: Arc<AppConfig>, service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/", post(book_appointment).get(list_appointments))
        .route("/cancel", post(cancel_appointment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
