use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{create_payment_order, verify_payment};
use crate::services::PaymentService;

pub fn payment_routes(config: Arc<AppConfig>, service: Arc<PaymentService>) -> Router {
    Router::new()
        .route("/orders", post(create_payment_order))
        .route("/verify", post(verify_payment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
