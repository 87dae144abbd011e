//! Database Module
//!
//! Embedded SurrealDB storage. 启动时幂等定义表结构和唯一索引。

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "vendai";
const DATABASE: &str = "vendai";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::prepare(db).await
    }

    /// In-memory database (tests and local experiments)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);
        Ok(Self { db })
    }
}

/// 定义表与索引 (幂等)
///
/// 表保持 SCHEMALESS，唯一性约束通过 UNIQUE INDEX 表达：
/// - merchant.email 唯一
/// - store.slug 唯一 (创建后不可变，由 repository 保证)
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    let statements = [
        "DEFINE TABLE IF NOT EXISTS merchant SCHEMALESS",
        "DEFINE INDEX IF NOT EXISTS idx_merchant_email ON merchant FIELDS email UNIQUE",
        "DEFINE TABLE IF NOT EXISTS store SCHEMALESS",
        "DEFINE INDEX IF NOT EXISTS idx_store_slug ON store FIELDS slug UNIQUE",
        "DEFINE TABLE IF NOT EXISTS product SCHEMALESS",
        "DEFINE INDEX IF NOT EXISTS idx_product_store ON product FIELDS store",
        "DEFINE TABLE IF NOT EXISTS order SCHEMALESS",
        "DEFINE INDEX IF NOT EXISTS idx_order_store ON order FIELDS store",
        "DEFINE INDEX IF NOT EXISTS idx_order_store_status ON order FIELDS store, status",
    ];

    for stmt in statements {
        db.query(stmt)
            .await
            .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?;
    }

    Ok(())
}
