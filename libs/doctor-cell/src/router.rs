use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::DoctorDirectory;

/// Public, read-only doctor listing.
pub fn doctor_routes(directory: Arc<dyn DoctorDirectory>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doc_id}", get(handlers::get_doctor))
        .with_state(directory)
}
