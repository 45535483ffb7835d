use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{get_profile, update_profile};
use crate::services::ProfileService;

pub fn profile_routes(config: Arc<AppConfig>, service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
