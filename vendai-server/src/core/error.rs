//! Server-level errors (startup and runtime)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("{0}")]
    App(#[from] shared::AppError),
}

/// 服务器启动/运行的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
