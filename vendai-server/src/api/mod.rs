//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 商家注册/登录
//! - [`store`] - 店铺资料与设置
//! - [`products`] - 商品管理 + 照片分析
//! - [`orders`] - 订单管理与回收
//! - [`dashboard`] - 商家看板
//! - [`storefront`] - 公开店面 (目录 + 会话开启)
//! - [`sessions`] - 店面会话 (购物车/结算/互动/助手)
//! - [`upload`] - 图片上传

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod sessions;
pub mod store;
pub mod storefront;
pub mod upload;

// Re-export common types for handlers
pub use crate::utils::AppResult;
