//! Product Model
//!
//! 商品属于一家店铺；颜色变体与各尺码库存内嵌在商品记录里

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Color variant of a product, holding its own photos and per-size stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Stable ID within the product (uuid string)
    pub id: String,
    /// Color name in pt-BR ("Azul Marinho")
    pub color: String,
    /// Display color, `#RRGGBB`
    pub color_hex: String,
    #[serde(default)]
    pub photos: Vec<String>,
    /// size label → quantity (always ≥ 0)
    #[serde(default)]
    pub stock: HashMap<String, i32>,
}

impl Variant {
    /// Whether every size of this color is at zero
    pub fn is_out_of_stock(&self) -> bool {
        self.stock.values().all(|q| *q <= 0)
    }

    /// Total units across all sizes of this color
    pub fn total_stock(&self) -> i32 {
        self.stock.values().filter(|q| **q > 0).sum()
    }

    /// First photo, if any (used as the cart line thumbnail)
    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    /// Record link to the owning store
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub price: f64,
    /// Promotional price; never validated against `price`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_price: Option<f64>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Gates storefront visibility; products are never physically removed
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_category() -> String {
    "outro".to_string()
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Effective storefront price (promo wins when present)
    pub fn display_price(&self) -> f64 {
        self.promo_price.unwrap_or(self.price)
    }

    /// Whether the product carries a promo price
    pub fn on_promo(&self) -> bool {
        self.promo_price.is_some()
    }

    /// Find a variant by its stable ID
    pub fn variant_by_id(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub promo_price: Option<f64>,
    pub variants: Option<Vec<Variant>>,
    pub is_active: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    /// Double-Option: `None` keeps the stored value, `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_price: Option<Option<f64>>,
    pub variants: Option<Vec<Variant>>,
    pub is_active: Option<bool>,
}
