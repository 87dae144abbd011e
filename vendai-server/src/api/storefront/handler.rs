//! Public storefront handlers
//!
//! Anonymous shopper surface: catalog fetch (with the same filter the
//! search box drives) and session opening. Nothing here requires auth.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::client::OpenSessionResponse;
use shared::models::BannerMessage;

use crate::assistant::welcome_message;
use crate::catalog::banner::active_banners;
use crate::catalog::{CategoryFilter, filter_products};
use crate::core::ServerState;
use crate::db::models::{Product, Store};
use crate::db::repository::{ProductRepository, StoreRepository};
use crate::utils::{AppError, ErrorCode};

/// Store fields safe for anonymous shoppers
#[derive(Debug, Serialize)]
pub struct PublicStore {
    pub slug: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub whatsapp: String,
    pub frete_info: Option<String>,
    pub pagamento_info: Option<String>,
    /// Banners already filtered to today's display window
    pub banners: Vec<BannerMessage>,
}

#[derive(Debug, Serialize)]
pub struct StorefrontPayload {
    pub store: PublicStore,
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogQuery {
    /// Free-text search ("vestido floral para festa")
    #[serde(default)]
    pub q: String,
    /// Category name, "sale" for promotions, empty for everything
    #[serde(default)]
    pub category: String,
}

async fn load_store(state: &ServerState, slug: &str) -> Result<Store, AppError> {
    StoreRepository::new(state.get_db())
        .find_by_slug(slug)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::StoreNotFound, "Loja não encontrada")
        })
}

/// GET /api/storefront/:slug - 店面目录
///
/// `q`/`category` run the same filter the storefront search box applies on
/// every keystroke.
pub async fn fetch_storefront(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<StorefrontPayload>, AppError> {
    let store = load_store(&state, &slug).await?;
    let store_id = store
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Store without id"))?;

    let products = ProductRepository::new(state.get_db())
        .find_active_by_store(&store_id)
        .await
        .map_err(AppError::from)?;

    let category = CategoryFilter::parse(&query.category);
    let filtered: Vec<Product> = filter_products(&products, &query.q, &category)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(StorefrontPayload {
        store: PublicStore {
            slug: store.slug,
            name: store.name,
            logo_url: store.logo_url,
            whatsapp: store.whatsapp,
            frete_info: store.settings.frete_info,
            pagamento_info: store.settings.pagamento_info,
            banners: active_banners(&store.settings.banner_messages, state.config.timezone),
        },
        products: filtered,
    }))
}

/// POST /api/storefront/:slug/sessions - 开启店面会话
pub async fn open_session(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<OpenSessionResponse>, AppError> {
    let store = load_store(&state, &slug).await?;

    let session = state.sessions.open(&store);
    let welcome = welcome_message(&store.name, store.settings.welcome_message.as_deref());

    Ok(Json(OpenSessionResponse {
        session_id: session.id.clone(),
        welcome_message: welcome,
    }))
}
