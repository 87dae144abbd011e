//! Store Model
//!
//! 每个商家一家店铺；slug 唯一且创建后不可变

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{StorePlan, StoreSettings};
use surrealdb::RecordId;

/// Store ID type
pub type StoreId = RecordId;

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<StoreId>,
    /// Owning merchant
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    /// Public URL handle, unique and immutable after creation
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// WhatsApp number, digits only
    pub whatsapp: String,
    #[serde(default)]
    pub plan: StorePlan,
    #[serde(default)]
    pub settings: StoreSettings,
    #[serde(default)]
    pub created_at: i64,
}

impl Store {
    pub fn new(owner: RecordId, slug: String, name: String, whatsapp: String, created_at: i64) -> Self {
        Self {
            id: None,
            owner,
            slug,
            name,
            logo_url: None,
            whatsapp,
            plan: StorePlan::default(),
            settings: StoreSettings::default(),
            created_at,
        }
    }
}

/// Update store payload — `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<StoreSettings>,
}
