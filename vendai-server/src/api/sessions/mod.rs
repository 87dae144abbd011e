//! Storefront session API 模块
//!
//! 购物车、结算、互动监控与 Vi 助手，全部挂在一个匿名会话上。

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions/{id}", session_routes())
}

fn session_routes() -> Router<ServerState> {
    Router::new()
        .route("/cart", get(handler::get_cart))
        .route("/cart/items", post(handler::add_item))
        .route(
            "/cart/items/{index}",
            patch(handler::change_qty).delete(handler::remove_item),
        )
        .route("/checkout", post(handler::checkout))
        .route("/engagement", get(handler::engagement))
        .route("/engagement/dismiss", post(handler::dismiss_engagement))
        .route("/assistant", post(handler::assistant))
        .route("/transcript", get(handler::transcript))
}
