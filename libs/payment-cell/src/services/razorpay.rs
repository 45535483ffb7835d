use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{CreateOrder, GatewayOrder, PaymentError};
use crate::services::gateway::PaymentGateway;

/// Razorpay Orders API client.
/// POST {base}/orders, GET {base}/orders/{id}, HTTP basic auth with the key pair.
pub struct RazorpayGateway {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayGateway {
    pub fn new(config: &AppConfig) -> Result<Self, PaymentError> {
        if !config.is_payment_configured() {
            return Err(PaymentError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            base_url: config.razorpay_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn parse_order(response: Response, action: &str) -> Result<GatewayOrder, PaymentError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Razorpay {} failed: {} - {}", action, status, body);
            return Err(PaymentError::Gateway(format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Gateway(format!("Failed to parse order response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, order: CreateOrder) -> Result<GatewayOrder, PaymentError> {
        let url = format!("{}/orders", self.base_url);
        debug!("Creating Razorpay order for receipt {}", order.receipt);

        let response = self.client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&order)
            .send()
            .await?;

        let created = Self::parse_order(response, "order creation").await?;
        info!("Created Razorpay order {}", created.id);
        Ok(created)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError> {
        let url = format!("{}/orders/{}", self.base_url, urlencoding::encode(order_id));

        let response = self.client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        Self::parse_order(response, "order fetch").await
    }
}
