//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`ApiResponse`] - 错误类型 (from shared::error)
//! - 日志、时间、分页等工具

pub mod logger;
pub mod result;
pub mod time;
pub mod types;

// Re-export error types from shared
pub use result::AppResult;
pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
