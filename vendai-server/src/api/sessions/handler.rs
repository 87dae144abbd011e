//! Storefront session handlers
//!
//! Every route resolves the session first; a swept or never-opened session
//! answers 404 and the client reopens one. Cart mutations and chat count
//! as interaction and reset the engagement timer; polling reads do not.

use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Path, State},
    http::header,
    response::Response,
};
use shared::client::{
    AddCartItemRequest, CartView, ChangeQtyRequest, CheckoutRequest, CheckoutResponse,
    EngagementView, TranscriptView,
};

use crate::assistant::{FALLBACK_APOLOGY, build_vi_system_prompt};
use crate::catalog::context::build_store_context;
use crate::core::ServerState;
use crate::db::models::Store;
use crate::db::repository::{OrderRepository, ProductRepository, StoreRepository};
use crate::storefront::session::StorefrontSession;
use crate::storefront::{checkout as checkout_flow, resolve_cart_line};
use crate::utils::{AppError, AppResult, ErrorCode};
use crate::whatsapp::handoff_url;

async fn load_session_store(
    state: &ServerState,
    session: &StorefrontSession,
) -> AppResult<Store> {
    StoreRepository::new(state.get_db())
        .find_by_id(&session.store_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))
}

/// GET /api/sessions/:id/cart - 当前购物车
pub async fn get_cart(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CartView>> {
    let session = state.sessions.get(&id)?;
    Ok(Json(session.cart_view()))
}

/// POST /api/sessions/:id/cart/items - 加入购物车
///
/// Resolves the live product, refuses sold-out/empty-size adds, merges by
/// (product, variant, size).
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<AddCartItemRequest>,
) -> AppResult<Json<CartView>> {
    let session = state.sessions.get(&id)?;
    session.touch();

    let product = ProductRepository::new(state.get_db())
        .find_by_id(&req.product_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    // A session only shops its own store's catalog
    if product.store != session.store_id || !product.is_active {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    let line = resolve_cart_line(&product, &req.variant_id, req.size.as_deref())?;
    session.add_line(line)?;

    Ok(Json(session.cart_view()))
}

/// PATCH /api/sessions/:id/cart/items/:index - 调整数量 (±1)
pub async fn change_qty(
    State(state): State<ServerState>,
    Path((id, index)): Path<(String, usize)>,
    Json(req): Json<ChangeQtyRequest>,
) -> AppResult<Json<CartView>> {
    let session = state.sessions.get(&id)?;
    session.touch();
    session.change_qty(index, req.delta)?;
    Ok(Json(session.cart_view()))
}

/// DELETE /api/sessions/:id/cart/items/:index - 移除一行
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((id, index)): Path<(String, usize)>,
) -> AppResult<Json<CartView>> {
    let session = state.sessions.get(&id)?;
    session.touch();
    session.remove_line(index)?;
    Ok(Json(session.cart_view()))
}

/// POST /api/sessions/:id/checkout - 结算
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let session = state.sessions.get(&id)?;
    session.touch();

    let store = load_session_store(&state, &session).await?;
    let orders = OrderRepository::new(state.get_db());

    let outcome =
        checkout_flow::submit(&session, &store, &orders, &req, state.config.timezone).await?;

    Ok(Json(outcome))
}

/// GET /api/sessions/:id/engagement - 互动监控状态
///
/// Polling this endpoint is NOT an interaction — it must not reset the
/// timer it reports on.
pub async fn engagement(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EngagementView>> {
    let session = state.sessions.get(&id)?;
    Ok(Json(EngagementView {
        prompt_pending: session.engagement.prompt_pending(),
        whatsapp_url: handoff_url(&session.store_whatsapp),
    }))
}

/// POST /api/sessions/:id/engagement/dismiss - 关闭提示并重新计时
pub async fn dismiss_engagement(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EngagementView>> {
    let session = state.sessions.get(&id)?;
    session.engagement.dismiss();
    session.touch();
    Ok(Json(EngagementView {
        prompt_pending: false,
        whatsapp_url: handoff_url(&session.store_whatsapp),
    }))
}

/// GET /api/sessions/:id/transcript - Vi 对话记录
pub async fn transcript(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TranscriptView>> {
    let session = state.sessions.get(&id)?;
    Ok(Json(TranscriptView {
        messages: session.transcript_snapshot(),
    }))
}

/// POST /api/sessions/:id/assistant - 向 Vi 提问 (流式回复)
///
/// The reply streams back as plain text chunks while the same chunks grow
/// one assistant message in the transcript. A transport failure mid-stream
/// replaces the partial message with the fixed apology. Single attempt —
/// the shopper retries by sending a new message.
pub async fn assistant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<shared::client::AssistantRequest>,
) -> AppResult<Response> {
    let session = state.sessions.get(&id)?;
    session.touch();

    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::validation("message required"));
    }

    // Fresh catalog snapshot for the system prompt
    let store = load_session_store(&state, &session).await?;
    let products = ProductRepository::new(state.get_db())
        .find_active_by_store(&session.store_id)
        .await
        .map_err(AppError::from)?;
    let system = build_vi_system_prompt(&build_store_context(&store, &products));

    session.push_user_message(message);
    let transcript = session.transcript_snapshot();

    session.begin_assistant_reply();

    let upstream = match state.assistant.stream_chat(system, &transcript).await {
        Ok(rx) => rx,
        Err(e) => {
            // Failed before the first chunk: the transcript gets the
            // apology and the shopper sees it as the whole reply
            tracing::warn!(error = %e, session = %session.id, "Assistant request failed");
            session.fail_assistant_reply(FALLBACK_APOLOGY);
            return text_stream_response_static(FALLBACK_APOLOGY);
        }
    };

    let (tx, body_rx) = tokio::sync::mpsc::channel::<Result<Bytes, std::convert::Infallible>>(32);
    tokio::spawn(pump_reply(session, upstream, tx));

    let stream = futures::stream::unfold(body_rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Failed to build stream response: {e}")))
}

/// Bridge the upstream completion into the transcript and the HTTP body.
/// Chunks apply strictly in arrival order; an abandoned HTTP caller stops
/// the body writes but the transcript still completes.
async fn pump_reply(
    session: Arc<StorefrontSession>,
    mut upstream: tokio::sync::mpsc::Receiver<AppResult<String>>,
    tx: tokio::sync::mpsc::Sender<Result<Bytes, std::convert::Infallible>>,
) {
    let mut caller_connected = true;

    while let Some(item) = upstream.recv().await {
        match item {
            Ok(chunk) => {
                session.append_assistant_chunk(&chunk);
                if caller_connected
                    && tx.send(Ok(Bytes::from(chunk))).await.is_err()
                {
                    caller_connected = false;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, session = %session.id, "Assistant stream interrupted");
                session.fail_assistant_reply(FALLBACK_APOLOGY);
                return;
            }
        }
    }

    session.complete_assistant_reply();
}

fn text_stream_response_static(body: &'static str) -> AppResult<Response> {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(body))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}
