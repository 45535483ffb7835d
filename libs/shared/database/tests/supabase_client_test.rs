use reqwest::Method;
use serde_json::{json, Value};
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_json, header, method, path};

use shared_config::{AppConfig, PaymentBackend, SlotPolicy, StorageBackend};
use shared_database::SupabaseClient;

fn config_for(uri: &str) -> AppConfig {
    AppConfig {
        supabase_url: format!("{}/", uri),
        supabase_anon_key: "anon-key".to_string(),
        supabase_jwt_secret: "secret".to_string(),
        supabase_storage_bucket: "profiles".to_string(),
        razorpay_key_id: String::new(),
        razorpay_key_secret: String::new(),
        razorpay_base_url: String::new(),
        currency: "INR".to_string(),
        storage_backend: StorageBackend::Supabase,
        payment_backend: PaymentBackend::Sandbox,
        slot_policy: SlotPolicy::Lenient,
        port: 4000,
    }
}

#[tokio::test]
async fn test_requests_carry_apikey_and_bearer_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server.uri()));
    let rows: Vec<Value> = client
        .request(Method::GET, "/rest/v1/doctors", None, None)
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(client.get_base_url(), mock_server.uri());
}

#[tokio::test]
async fn test_rpc_posts_arguments_to_function_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/claim_doctor_slot"))
        .and(body_json(json!({"p_slot_time": "10:00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("claimed")))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server.uri()));
    let outcome: String = client
        .rpc("claim_doctor_slot", json!({"p_slot_time": "10:00"}), None)
        .await
        .unwrap();

    assert_eq!(outcome, "claimed");
}

#[tokio::test]
async fn test_error_status_becomes_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key"))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server.uri()));
    let result: anyhow::Result<Vec<Value>> = client
        .request_returning(Method::PATCH, "/rest/v1/users?id=eq.1", Some("user-token"), Some(json!({})))
        .await;

    let message = result.unwrap_err().to_string();
    assert!(message.starts_with("Conflict"));
}
