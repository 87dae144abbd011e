//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Active products of a store, newest first (public storefront view)
    pub async fn find_active_by_store(&self, store: &RecordId) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE store = $store AND is_active = true ORDER BY created_at DESC")
            .bind(("store", store.clone()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Every product of a store, active or not (merchant dashboard)
    pub async fn find_all_by_store(&self, store: &RecordId) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE store = $store ORDER BY created_at DESC")
            .bind(("store", store.clone()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record = parse_record_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record).await?;
        Ok(product)
    }

    /// Create a new product for a store
    pub async fn create(&self, store: RecordId, data: ProductCreate) -> RepoResult<Product> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name cannot be empty".into()));
        }

        let product = Product {
            id: None,
            store,
            name: data.name,
            description: data.description.unwrap_or_default(),
            category: data.category.unwrap_or_else(|| "outro".to_string()),
            price: data.price,
            promo_price: data.promo_price,
            variants: data.variants.unwrap_or_default(),
            is_active: data.is_active.unwrap_or(true),
            created_at: self.base.now_millis(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record = parse_record_id(PRODUCT_TABLE, id)?;

        // MERGE payload without promo_price; clearing it needs an explicit
        // `SET promo_price = NONE` pass below.
        #[derive(Serialize)]
        struct ProductUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            promo_price: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            variants: Option<Vec<crate::db::models::Variant>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let clear_promo = matches!(data.promo_price, Some(None));
        let update_data = ProductUpdateDb {
            name: data.name,
            description: data.description,
            category: data.category,
            price: data.price,
            promo_price: data.promo_price.flatten(),
            variants: data.variants,
            is_active: data.is_active,
        };

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", record.clone()))
            .bind(("data", update_data))
            .await?;

        if clear_promo {
            self.base
                .db()
                .query("UPDATE $thing SET promo_price = NONE")
                .bind(("thing", record.clone()))
                .await?;
        }

        self.find_by_id(&record.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Toggle storefront visibility (products are never physically removed)
    pub async fn set_active(&self, id: &str, active: bool) -> RepoResult<Product> {
        let record = parse_record_id(PRODUCT_TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = $active")
            .bind(("thing", record.clone()))
            .bind(("active", active))
            .await?;

        self.find_by_id(&record.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}
