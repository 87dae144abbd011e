//! Shared types for the vend.ai platform
//!
//! Everything the server and its clients must agree on lives here:
//!
//! - **error**: unified error codes, [`AppError`] and [`ApiResponse`]
//! - **models**: order status/snapshot, store settings, chat and analysis
//!   wire types
//! - **client**: request/response DTOs for every API surface
//! - **util**: order numbers, phone normalization, slugs

pub mod client;
pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{ChatMessage, ChatRole, OrderItemSnapshot, OrderStatus};
