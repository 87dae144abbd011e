//! Checkout Submitter
//!
//! Converts a ledger into a persisted Order and hands the shopper off to
//! the store's WhatsApp. Validation is local and runs before any database
//! effect; on failure of any kind the ledger is left untouched and no
//! retry is attempted.

use chrono_tz::Tz;
use shared::client::{CheckoutRequest, CheckoutResponse};
use shared::util::{digits_only, generate_order_number};

use crate::db::models::{OrderCreate, Store};
use crate::db::repository::OrderRepository;
use crate::storefront::session::StorefrontSession;
use crate::utils::{AppError, AppResult, ErrorCode};
use crate::whatsapp::{OrderMessage, build_whatsapp_url, format_order_message};

/// Inline validation messages (pt-BR, shown next to the offending field)
pub const MSG_NAME_REQUIRED: &str = "Informe seu nome";
pub const MSG_WHATSAPP_REQUIRED: &str = "Informe seu WhatsApp";

/// Validate the customer contact fields. Field-keyed errors, no network.
fn validate(req: &CheckoutRequest) -> AppResult<(String, String)> {
    let name = req.customer_name.trim();
    let phone = req.customer_whatsapp.trim();

    let mut err = AppError::validation("Campos obrigatórios faltando");
    let mut invalid = false;
    if name.is_empty() {
        err = err.with_detail("customer_name", MSG_NAME_REQUIRED);
        invalid = true;
    }
    if phone.is_empty() {
        err = err.with_detail("customer_whatsapp", MSG_WHATSAPP_REQUIRED);
        invalid = true;
    }
    if invalid {
        return Err(err);
    }

    Ok((name.to_string(), phone.to_string()))
}

/// Submit the session's ledger as an order.
///
/// On success the order is persisted with a frozen item snapshot, the
/// WhatsApp deep link is built and the ledger is cleared. On any failure
/// the ledger and the shopper's inputs stay as they were.
pub async fn submit(
    session: &StorefrontSession,
    store: &Store,
    orders: &OrderRepository,
    req: &CheckoutRequest,
    tz: Tz,
) -> AppResult<CheckoutResponse> {
    let (name, phone) = validate(req)?;

    let (items, total) = session.with_cart(|cart| (cart.snapshot(), cart.total()));
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let notes = req.notes.trim().to_string();
    let order_number = generate_order_number();

    let created = orders
        .create(OrderCreate {
            store: session.store_id.clone(),
            order_number: order_number.clone(),
            customer_name: name.clone(),
            customer_whatsapp: digits_only(&phone),
            items: items.clone(),
            total,
            notes: notes.clone(),
        })
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, slug = %session.store_slug, "Order creation failed");
            AppError::with_message(ErrorCode::OrderCreateFailed, "Erro ao criar pedido")
        })?;

    let order_id = created
        .id
        .map(|id| id.to_string())
        .unwrap_or_default();

    let message = format_order_message(
        &OrderMessage {
            store_slug: &store.slug,
            order_number: &order_number,
            customer_name: &name,
            customer_phone: &phone,
            notes: &notes,
            items: &items,
        },
        tz,
    );
    let whatsapp_url = build_whatsapp_url(&store.whatsapp, &message);

    // Only after the insert succeeded
    session.clear_cart();

    tracing::info!(
        order_number = %order_number,
        slug = %session.store_slug,
        total = total,
        "Order placed"
    );

    Ok(CheckoutResponse {
        order_number,
        order_id,
        whatsapp_url,
    })
}
