use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_json, method, path, query_param};

use doctor_cell::models::{DoctorListQuery, SlotClaim, SlotKey, SlotRelease};
use doctor_cell::router::doctor_routes;
use doctor_cell::services::{DoctorDirectory, SupabaseDoctorDirectory};
use shared_database::supabase::SupabaseClient;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn directory_for(mock_server: &MockServer) -> SupabaseDoctorDirectory {
    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();
    SupabaseDoctorDirectory::new(Arc::new(SupabaseClient::new(&config)))
}

#[tokio::test]
async fn test_find_doctor_parses_calendar() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(
                &doctor_id.to_string(),
                500.0,
                true,
                json!({"2024-05-01": ["10:00", "10:30"]}),
            )
        ])))
        .mount(&mock_server)
        .await;

    let doctor = directory_for(&mock_server)
        .find_by_id(doctor_id)
        .await
        .unwrap()
        .expect("doctor should exist");

    assert_eq!(doctor.id, doctor_id);
    assert_eq!(doctor.fees, 500.0);
    assert!(doctor.slots_booked.is_taken("2024-05-01", "10:30"));
    assert!(!doctor.slots_booked.is_taken("2024-05-02", "10:30"));
}

#[tokio::test]
async fn test_find_unknown_doctor_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let doctor = directory_for(&mock_server).find_by_id(Uuid::new_v4()).await.unwrap();
    assert!(doctor.is_none());
}

#[tokio::test]
async fn test_claim_slot_calls_conditional_function() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/claim_doctor_slot"))
        .and(body_json(json!({
            "p_doctor_id": doctor_id,
            "p_slot_date": "2024-05-01",
            "p_slot_time": "10:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("taken")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = directory_for(&mock_server)
        .claim_slot(&SlotKey::new(doctor_id, "2024-05-01", "10:00"))
        .await
        .unwrap();

    assert_eq!(outcome, SlotClaim::Taken);
}

#[tokio::test]
async fn test_release_slot_reports_missing_doctor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/release_doctor_slot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("missing")))
        .mount(&mock_server)
        .await;

    let outcome = directory_for(&mock_server)
        .release_slot(&SlotKey::new(Uuid::new_v4(), "2024-05-01", "10:00"))
        .await
        .unwrap();

    assert_eq!(outcome, SlotRelease::DoctorMissing);
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let result = directory_for(&mock_server).list(&DoctorListQuery::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_route_wraps_doctors_in_envelope() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("speciality", "eq.Dermatologist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&doctor_id, 700.0, true, json!({}))
        ])))
        .mount(&mock_server)
        .await;

    let app = doctor_routes(Arc::new(directory_for(&mock_server)));
    let response = app
        .oneshot(
            Request::get("/?speciality=Dermatologist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
    assert_eq!(json_response["data"][0]["id"], doctor_id);
}

#[tokio::test]
async fn test_get_route_reports_unknown_doctor_in_band() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = doctor_routes(Arc::new(directory_for(&mock_server)));
    let response = app
        .oneshot(
            Request::get(format!("/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], false);
    assert_eq!(json_response["message"], "Doctor not found");
}
