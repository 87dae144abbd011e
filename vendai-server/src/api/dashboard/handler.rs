//! Dashboard handlers
//!
//! Headline numbers for the merchant home screen. "Today" is bounded in
//! the business timezone, not UTC.

use axum::{Json, extract::State};
use shared::client::DashboardSummary;
use shared::models::OrderStatus;

use crate::auth::CurrentMerchant;
use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::utils::AppError;
use crate::utils::time::{current_business_date, day_end_millis, day_start_millis};

/// GET /api/dashboard - 看板汇总
pub async fn summary(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
) -> Result<Json<DashboardSummary>, AppError> {
    let repo = OrderRepository::new(state.get_db());
    let store = merchant.store_record_id()?;

    let tz = state.config.timezone;
    let today = current_business_date(tz);
    let start = day_start_millis(today, tz);
    let end = day_end_millis(today, tz);

    let novos = repo
        .count_by_status(&store, OrderStatus::Novo)
        .await
        .map_err(AppError::from)?;
    let confirmados = repo
        .count_by_status_between(&store, OrderStatus::Confirmado, start, end)
        .await
        .map_err(AppError::from)?;
    let em_entrega = repo
        .count_by_status(&store, OrderStatus::EmEntrega)
        .await
        .map_err(AppError::from)?;
    let total_hoje = repo
        .revenue_between(&store, start, end)
        .await
        .map_err(AppError::from)?;

    Ok(Json(DashboardSummary {
        novos,
        confirmados,
        em_entrega,
        total_hoje,
    }))
}
