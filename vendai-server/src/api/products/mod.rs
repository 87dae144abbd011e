//! Product API 模块

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/analyze", post(handler::analyze))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/active", patch(handler::set_active))
}
