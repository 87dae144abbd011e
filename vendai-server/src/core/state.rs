use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::assistant::AssistantClient;
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::storefront::SessionManager;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是平台的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | sessions | Arc<SessionManager> | 店面会话注册表 |
/// | assistant | Arc<AssistantClient> | 助手后端客户端 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 店面会话注册表
    pub sessions: Arc<SessionManager>,
    /// 助手后端客户端
    pub assistant: Arc<AssistantClient>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/vendai.db)
    /// 3. 各服务 (JWT, SessionManager, AssistantClient)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("vendai.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config, db_service)
    }

    /// 用现成的数据库构造状态 (测试用内存库走这里)
    pub fn with_db(config: &Config, db_service: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sessions = Arc::new(SessionManager::with_window(std::time::Duration::from_secs(
            config.inactivity_window_secs,
        )));
        let assistant = Arc::new(AssistantClient::new(config.assistant.clone()));

        if !assistant.is_configured() {
            tracing::warn!("ANTHROPIC_API_KEY not set — assistant endpoints will be unavailable");
        }

        Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
            sessions,
            assistant,
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 店面会话闲置清扫器
    pub fn start_background_tasks(&self) {
        self.sessions.start_sweeper();
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
