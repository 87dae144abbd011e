//! Product API Handlers
//!
//! All routes are store-scoped: a product belonging to another merchant's
//! store is rejected before any mutation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::client::AnalyzeRequest;
use shared::models::ProductAnalysis;
use validator::Validate;

use crate::assistant::analyze::analyze_photos;
use crate::auth::CurrentMerchant;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, Variant};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, ErrorCode};

/// Inbound product payload (create and full update share the shape)
#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 200, message = "name e price são obrigatórios"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "price deve ser não-negativo"))]
    pub price: f64,
    /// Never validated against `price` — promo above base is accepted
    #[serde(default)]
    #[validate(range(min = 0.0, message = "promo_price deve ser não-negativo"))]
    pub promo_price: Option<f64>,
    #[serde(default)]
    pub variants: Option<Vec<Variant>>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl ProductPayload {
    fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|e| {
            let mut err = AppError::validation("Dados do produto inválidos");
            for (field, failures) in e.field_errors() {
                if let Some(first) = failures.first() {
                    let message = first
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "inválido".to_string());
                    err = err.with_detail(field.to_string(), message);
                }
            }
            err
        })
    }
}

/// Load a product and refuse cross-store access
async fn load_scoped(
    repo: &ProductRepository,
    merchant: &CurrentMerchant,
    id: &str,
) -> Result<Product, AppError> {
    let product = repo
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    if product.store.to_string() != merchant.store_id {
        return Err(AppError::store_mismatch());
    }
    Ok(product)
}

/// GET /api/products - 当前店铺的全部商品 (含下架)
pub async fn list(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
) -> Result<Json<Vec<Product>>, AppError> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo
        .find_all_by_store(&merchant.store_record_id()?)
        .await
        .map_err(AppError::from)?;

    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let repo = ProductRepository::new(state.get_db());
    let product = load_scoped(&repo, &merchant, &id).await?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.check()?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(
            merchant.store_record_id()?,
            ProductCreate {
                name: payload.name,
                description: payload.description,
                category: payload.category,
                price: payload.price,
                promo_price: payload.promo_price,
                variants: payload.variants,
                is_active: payload.active,
            },
        )
        .await
        .map_err(AppError::from)?;

    tracing::info!(store = %merchant.store_id, product = %product.name, "Product created");

    Ok(Json(product))
}

/// PUT /api/products/:id - 更新商品 (full replace of the edited fields)
pub async fn update(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.check()?;

    let repo = ProductRepository::new(state.get_db());
    load_scoped(&repo, &merchant, &id).await?;

    let product = repo
        .update(
            &id,
            ProductUpdate {
                name: Some(payload.name),
                description: Some(payload.description.unwrap_or_default()),
                category: Some(payload.category.unwrap_or_else(|| "outro".to_string())),
                price: Some(payload.price),
                // Absent promo in the payload clears the stored one — the
                // edit form always sends the full product
                promo_price: Some(payload.promo_price),
                variants: Some(payload.variants.unwrap_or_default()),
                is_active: payload.active,
            },
        )
        .await
        .map_err(AppError::from)?;

    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// PATCH /api/products/:id/active - 上/下架商品
pub async fn set_active(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<Product>, AppError> {
    let repo = ProductRepository::new(state.get_db());
    load_scoped(&repo, &merchant, &id).await?;

    let product = repo.set_active(&id, req.active).await.map_err(AppError::from)?;

    tracing::info!(
        store = %merchant.store_id,
        product = %id,
        active = req.active,
        "Product visibility toggled"
    );

    Ok(Json(product))
}

/// POST /api/products/analyze - 照片 → 商品元数据
///
/// Best effort: parse failures surface an assistant error and the merchant
/// fills the form manually.
pub async fn analyze(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ProductAnalysis>, AppError> {
    let analysis = analyze_photos(&state.assistant, &req.images).await?;

    tracing::info!(
        store = %merchant.store_id,
        name = %analysis.name,
        variants = analysis.variants.len(),
        "Product photo analysis completed"
    );

    Ok(Json(analysis))
}
