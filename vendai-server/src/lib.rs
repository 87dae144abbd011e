//! vend.ai Server - 多租户店面平台
//!
//! # 架构概述
//!
//! 本模块是平台服务的主入口，提供以下核心功能：
//!
//! - **店面会话** (`storefront`): 购物车账本、结算、互动监控
//! - **目录逻辑** (`catalog`): 过滤、变体/库存解析、横幅窗口
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **助手** (`assistant`): Vi 流式对话与照片分析
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! vendai-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── catalog/       # 目录过滤与库存
//! ├── storefront/    # 会话、购物车、结算
//! ├── assistant/     # Vi 桥接
//! ├── whatsapp/      # 消息模板与深链
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod money;
pub mod storefront;
pub mod utils;
pub mod whatsapp;

// Re-export 公共类型
pub use auth::{CurrentMerchant, JwtService};
pub use core::{Config, Server, ServerState};
pub use storefront::{CartLedger, SessionManager, StorefrontSession};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/vendai".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
                          __      _
 _   _____  ____  ____/ /___ _(_)
| | / / _ \/ __ \/ __  / __ `/ /
| |/ /  __/ / / / /_/ / /_/ / /
|___/\___/_/ /_/\__,_/\__,_/_/
    "#
    );
}
