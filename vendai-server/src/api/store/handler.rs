//! Store settings handlers
//!
//! The merchant edits one record: profile fields plus the settings object.
//! Settings use merge semantics — fields absent from the request keep
//! their stored value.

use axum::{Json, extract::State};
use shared::client::StoreUpdateRequest;
use shared::util::digits_only;

use crate::auth::CurrentMerchant;
use crate::core::ServerState;
use crate::db::models::{Store, StoreUpdate};
use crate::db::repository::StoreRepository;
use crate::utils::{AppError, ErrorCode};

/// GET /api/store - 当前商家的店铺
pub async fn get_store(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
) -> Result<Json<Store>, AppError> {
    let stores = StoreRepository::new(state.get_db());
    let store = stores
        .find_by_id(&merchant.store_record_id()?)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;

    Ok(Json(store))
}

/// PATCH /api/store - 更新店铺资料与设置 (merge 语义)
pub async fn update_store(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    Json(req): Json<StoreUpdateRequest>,
) -> Result<Json<Store>, AppError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Nome obrigatório"));
    }

    let stores = StoreRepository::new(state.get_db());
    let store_id = merchant.store_record_id()?;

    // Merge the settings object: absent request fields keep stored values
    let current = stores
        .find_by_id(&store_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;

    let mut settings = current.settings;
    if let Some(welcome) = req.welcome_message {
        settings.welcome_message = Some(welcome);
    }
    if let Some(frete) = req.frete_info {
        settings.frete_info = Some(frete);
    }
    if let Some(pagamento) = req.pagamento_info {
        settings.pagamento_info = Some(pagamento);
    }
    if let Some(banners) = req.banner_messages {
        // Window bounds must be well-formed dates; comparison is lexical
        for banner in &banners {
            for bound in [&banner.start_date, &banner.end_date].into_iter().flatten() {
                crate::utils::time::parse_date(bound)?;
            }
        }
        settings.banner_messages = banners;
    }
    if let Some(delay) = req.inactivity_delay_secs {
        settings.inactivity_delay_secs = Some(delay);
    }

    let update = StoreUpdate {
        name: Some(name),
        whatsapp: req.whatsapp.as_deref().map(digits_only),
        logo_url: req.logo_url,
        settings: Some(settings),
    };

    let updated = stores.update(&store_id, update).await.map_err(AppError::from)?;

    tracing::info!(store = %merchant.store_id, "Store settings updated");

    Ok(Json(updated))
}
