//! Store settings API 模块 (merchant-facing)

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/store", get(handler::get_store).patch(handler::update_store))
}
