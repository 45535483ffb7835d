use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{AppConfig, PaymentBackend, SlotPolicy, StorageBackend};
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub razorpay_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            razorpay_base_url: "http://localhost:54322/v1".to_string(),
        }
    }
}

impl TestConfig {
    /// Points both Supabase and the payment gateway at a mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            razorpay_base_url: format!("{}/v1", uri),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            supabase_storage_bucket: "profiles".to_string(),
            razorpay_key_id: "rzp_test_key".to_string(),
            razorpay_key_secret: "rzp_test_secret".to_string(),
            razorpay_base_url: self.razorpay_base_url.clone(),
            currency: "INR".to_string(),
            storage_backend: StorageBackend::Supabase,
            payment_backend: PaymentBackend::Razorpay,
            slot_policy: SlotPolicy::Lenient,
            port: 4000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "not-a-jwt".to_string()
    }
}

/// Row shapes as PostgREST and the orders API return them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn user_response(user_id: &str, name: &str) -> Value {
        json!({
            "id": user_id,
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            "image": null,
            "phone": "0000000000",
            "address": {"line1": "", "line2": ""},
            "gender": "Not Selected",
            "dob": "Not Selected"
        })
    }

    pub fn doctor_response(doctor_id: &str, fees: f64, available: bool, slots_booked: Value) -> Value {
        json!({
            "id": doctor_id,
            "name": "Dr. Test",
            "email": "doctor@example.com",
            "image": "https://cdn.example.com/doctor.png",
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "Test doctor",
            "available": available,
            "fees": fees,
            "address": {"line1": "17th Cross", "line2": "Richmond"},
            "slots_booked": slots_booked
        })
    }

    pub fn appointment_response(
        appointment_id: &str,
        user_id: &str,
        doctor_id: &str,
        slot_date: &str,
        slot_time: &str,
        cancelled: bool,
    ) -> Value {
        json!({
            "id": appointment_id,
            "user_id": user_id,
            "doc_id": doctor_id,
            "slot_date": slot_date,
            "slot_time": slot_time,
            "user_data": Self::user_response(user_id, "Test User"),
            "doc_data": {
                "id": doctor_id,
                "name": "Dr. Test",
                "email": "doctor@example.com",
                "image": null,
                "speciality": "General physician",
                "degree": "MBBS",
                "experience": "4 Years",
                "about": "Test doctor",
                "available": true,
                "fees": 500.0,
                "address": {"line1": "17th Cross", "line2": "Richmond"}
            },
            "amount": 500.0,
            "created_at": "2024-05-01T09:00:00Z",
            "cancelled": cancelled,
            "payment": false
        })
    }

    pub fn order_response(order_id: &str, amount_minor: i64, receipt: &str, status: &str) -> Value {
        json!({
            "id": order_id,
            "entity": "order",
            "amount": amount_minor,
            "amount_paid": if status == "paid" { amount_minor } else { 0 },
            "currency": "INR",
            "receipt": receipt,
            "status": status,
            "attempts": 0,
            "created_at": 1714550400
        })
    }
}
