use axum::{
    body::{to_bytes, Body},
    extract::Extension,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use shared_models::auth::User;
use shared_utils::extractor::auth_middleware;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn protected_app() -> Router {
    let config = TestConfig::default().to_arc();
    Router::new()
        .route("/whoami", get(|Extension(user): Extension<User>| async move { user.id }))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_valid_token_reaches_handler_with_principal() {
    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &TestConfig::default().jwt_secret, Some(1));

    let response = protected_app()
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, user.id);
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let response = protected_app()
        .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not Authorized, Login Again");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let user = TestUser::default();
    let token = JwtTestUtils::create_expired_token(&user, &TestConfig::default().jwt_secret);

    let response = protected_app()
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let response = protected_app()
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
