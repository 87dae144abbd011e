//! Public storefront API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/storefront/{slug}", get(handler::fetch_storefront))
        .route("/api/storefront/{slug}/sessions", post(handler::open_session))
}
