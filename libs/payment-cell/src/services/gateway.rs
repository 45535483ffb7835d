use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{CreateOrder, GatewayOrder, PaymentError};

/// External payment provider: creates payable orders and reports their state.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: CreateOrder) -> Result<GatewayOrder, PaymentError>;

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError>;
}

/// Local stand-in for the provider. Orders stay `created` until
/// [`SandboxGateway::mark_paid`] is called.
#[derive(Default)]
pub struct SandboxGateway {
    orders: RwLock<HashMap<String, GatewayOrder>>,
}

impl SandboxGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the customer completing checkout. Returns false for
    /// unknown orders.
    pub async fn mark_paid(&self, order_id: &str) -> bool {
        let mut orders = self.orders.write().await;
        match orders.get_mut(order_id) {
            Some(order) => {
                order.status = "paid".to_string();
                order.amount_paid = order.amount;
                order.attempts += 1;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn create_order(&self, order: CreateOrder) -> Result<GatewayOrder, PaymentError> {
        let created = GatewayOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount: order.amount,
            amount_paid: 0,
            currency: order.currency,
            receipt: Some(order.receipt),
            status: "created".to_string(),
            attempts: 0,
            created_at: Utc::now().timestamp(),
        };
        debug!("Sandbox order {} for {}", created.id, order.amount);

        self.orders.write().await.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError> {
        self.orders
            .read()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| PaymentError::Gateway(format!("order {} does not exist", order_id)))
    }
}

