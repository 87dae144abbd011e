//! 认证模块 - JWT + Argon2
//!
//! - [`JwtService`]: 令牌生成与验证
//! - [`require_auth`]: 认证中间件 (公共路径白名单)
//! - [`CurrentMerchant`]: 请求上下文中的当前商家

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentMerchant, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
