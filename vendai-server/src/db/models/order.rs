//! Order Model
//!
//! 订单条目在创建时冻结 (denormalized snapshot)，之后目录变更不影响历史订单

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{OrderItemSnapshot, OrderStatus};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Persisted order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Record link to the owning store
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    /// Short human-readable number ("4821")
    pub order_number: String,
    pub customer_name: String,
    /// Digits only
    pub customer_whatsapp: String,
    /// Frozen line items; immutable after creation
    #[serde(default)]
    pub items: Vec<OrderItemSnapshot>,
    pub total: f64,
    #[serde(default)]
    pub notes: String,
    pub status: OrderStatus,
    /// Unix millis of the merchant's recovery outreach, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_sent_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

/// Create order payload (assembled by the checkout submitter)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub order_number: String,
    pub customer_name: String,
    pub customer_whatsapp: String,
    pub items: Vec<OrderItemSnapshot>,
    pub total: f64,
    pub notes: String,
}
