//! Authentication Handlers
//!
//! Merchant registration, login and token management

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse, MerchantInfo, RegisterRequest, RegisterResponse};
use shared::util::{digits_only, slugify};

use crate::auth::CurrentMerchant;
use crate::core::ServerState;
use crate::db::models::{Merchant, Store};
use crate::db::repository::{MerchantRepository, StoreRepository};
use crate::utils::{AppError, ErrorCode};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Register handler
///
/// Creates the merchant account and its store in one step. The store slug
/// is derived from the store name; collisions get a timestamp suffix.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let store_name = req.store_name.trim().to_string();
    let whatsapp = digits_only(&req.whatsapp);

    if email.is_empty() || req.password.is_empty() || store_name.is_empty() || whatsapp.is_empty() {
        return Err(AppError::validation("Campos obrigatórios faltando"));
    }
    if req.password.len() < 6 {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            "Senha deve ter ao menos 6 caracteres",
        ));
    }

    let merchants = MerchantRepository::new(state.get_db());
    let stores = StoreRepository::new(state.get_db());

    if merchants.find_by_email(&email).await.map_err(AppError::from)?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmailAlreadyRegistered,
            "E-mail já cadastrado",
        ));
    }

    let hash = Merchant::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    // Slug from the store name, timestamp-suffixed on collision
    let now_millis = chrono::Utc::now().timestamp_millis();
    let mut slug = slugify(&store_name);
    if slug.is_empty() {
        slug = format!("loja-{}", now_millis);
    }
    if stores.slug_exists(&slug).await.map_err(AppError::from)? {
        slug = format!("{}-{}", slug, now_millis);
    }

    let merchant = merchants.create(email.clone(), hash).await.map_err(AppError::from)?;
    let merchant_id = merchant
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Merchant created without id"))?;

    let store = stores
        .create(Store::new(
            merchant_id.clone(),
            slug.clone(),
            store_name,
            whatsapp,
            now_millis,
        ))
        .await
        .map_err(AppError::from)?;
    let store_id = store
        .id
        .ok_or_else(|| AppError::internal("Store created without id"))?;

    merchants
        .set_store(&merchant_id, &store_id)
        .await
        .map_err(AppError::from)?;

    tracing::info!(
        merchant = %merchant_id,
        slug = %slug,
        "Merchant registered"
    );

    Ok(Json(RegisterResponse { slug }))
}

/// Login handler
///
/// Authenticates merchant credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let merchants = MerchantRepository::new(state.get_db());
    let email = req.email.trim().to_lowercase();

    let merchant = merchants.find_by_email(&email).await.map_err(AppError::from)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let merchant = match merchant {
        Some(m) => {
            let password_valid = m
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            m
        }
        None => {
            tracing::warn!(email = %email, "Login failed - merchant not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let merchant_id = merchant
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let store_id = merchant
        .store
        .clone()
        .ok_or_else(|| AppError::internal("Merchant has no store"))?;

    let stores = StoreRepository::new(state.get_db());
    let store = stores
        .find_by_id(&store_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;

    let token = state
        .get_jwt_service()
        .generate_token(&merchant_id, &merchant.email, &store_id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        merchant = %merchant_id,
        slug = %store.slug,
        "Merchant logged in"
    );

    Ok(Json(LoginResponse {
        token,
        merchant: MerchantInfo {
            id: merchant_id,
            email: merchant.email,
            store_id: store_id.to_string(),
            store_slug: store.slug,
            store_name: store.name,
        },
    }))
}

/// Get current merchant info
pub async fn me(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
) -> Result<Json<MerchantInfo>, AppError> {
    let stores = StoreRepository::new(state.get_db());
    let store_id = merchant.store_record_id()?;
    let store = stores
        .find_by_id(&store_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;

    Ok(Json(MerchantInfo {
        id: merchant.id,
        email: merchant.email,
        store_id: merchant.store_id,
        store_slug: store.slug,
        store_name: store.name,
    }))
}

/// Logout handler
pub async fn logout(merchant: CurrentMerchant) -> Json<()> {
    tracing::info!(
        merchant = %merchant.id,
        email = %merchant.email,
        "Merchant logged out"
    );

    Json(())
}
