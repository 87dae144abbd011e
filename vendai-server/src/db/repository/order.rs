//! Order Repository
//!
//! 订单一旦创建，items 快照不再变化；状态流转不在写路径校验
//! (调用方负责记录非法流转的告警)。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderCreate};
use shared::models::OrderStatus;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order in NOVO with a frozen item snapshot
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation("order has no items".into()));
        }

        let order = Order {
            id: None,
            store: data.store,
            order_number: data.order_number,
            customer_name: data.customer_name,
            customer_whatsapp: data.customer_whatsapp,
            items: data.items,
            total: data.total,
            notes: data.notes,
            status: OrderStatus::Novo,
            recovery_sent_at: None,
            created_at: self.base.now_millis(),
        };

        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record).await?;
        Ok(order)
    }

    /// Orders of a store, newest first, optionally filtered by status
    pub async fn find_by_store(
        &self,
        store: &RecordId,
        status: Option<OrderStatus>,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Order>> {
        let mut query = String::from("SELECT * FROM order WHERE store = $store");
        if status.is_some() {
            query.push_str(" AND status = $status");
        }
        query.push_str(" ORDER BY created_at DESC LIMIT $limit START $offset");

        let mut q = self
            .base
            .db()
            .query(query)
            .bind(("store", store.clone()))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64));
        if let Some(status) = status {
            q = q.bind(("status", status));
        }

        let orders: Vec<Order> = q.await?.take(0)?;
        Ok(orders)
    }

    /// Set the order status. The state machine is advisory — any status is
    /// persisted here.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let record = parse_record_id(ORDER_TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .bind(("thing", record.clone()))
            .bind(("status", status))
            .await?;

        self.find_by_id(&record.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Stamp the recovery outreach time
    pub async fn mark_recovery_sent(&self, id: &str) -> RepoResult<Order> {
        let record = parse_record_id(ORDER_TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET recovery_sent_at = $now")
            .bind(("thing", record.clone()))
            .bind(("now", self.base.now_millis()))
            .await?;

        self.find_by_id(&record.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Count orders of a store in the given status
    pub async fn count_by_status(&self, store: &RecordId, status: OrderStatus) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order WHERE store = $store AND status = $status GROUP ALL")
            .bind(("store", store.clone()))
            .bind(("status", status))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Count orders of a store in a status created within [start, end) millis
    pub async fn count_by_status_between(
        &self,
        store: &RecordId,
        status: OrderStatus,
        start: i64,
        end: i64,
    ) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM order WHERE store = $store AND status = $status \
                 AND created_at >= $start AND created_at < $end GROUP ALL",
            )
            .bind(("store", store.clone()))
            .bind(("status", status))
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Revenue within [start, end) millis, cancelled orders excluded
    pub async fn revenue_between(
        &self,
        store: &RecordId,
        start: i64,
        end: i64,
    ) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(total) AS revenue FROM order WHERE store = $store \
                 AND status != $cancelled AND created_at >= $start AND created_at < $end \
                 GROUP ALL",
            )
            .bind(("store", store.clone()))
            .bind(("cancelled", OrderStatus::Cancelado))
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let revenue: Option<f64> = result.take((0, "revenue"))?;
        Ok(revenue.unwrap_or(0.0))
    }

    /// NOVO orders created at or before `cutoff_millis` without a recovery
    /// stamp — the recovery panel's candidates
    pub async fn find_recovery_candidates(
        &self,
        store: &RecordId,
        cutoff_millis: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE store = $store AND status = $novo \
                 AND created_at <= $cutoff AND recovery_sent_at IS NONE \
                 ORDER BY created_at DESC",
            )
            .bind(("store", store.clone()))
            .bind(("novo", OrderStatus::Novo))
            .bind(("cutoff", cutoff_millis))
            .await?
            .take(0)?;
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::OrderItemSnapshot;

    async fn repo() -> OrderRepository {
        let service = DbService::memory().await.unwrap();
        OrderRepository::new(service.db)
    }

    fn store_id(n: u32) -> RecordId {
        format!("store:s{n}").parse().unwrap()
    }

    fn sample_create(store: RecordId, number: &str, total: f64) -> OrderCreate {
        OrderCreate {
            store,
            order_number: number.to_string(),
            customer_name: "Ana".to_string(),
            customer_whatsapp: "5511988887777".to_string(),
            items: vec![OrderItemSnapshot {
                product_id: "product:a".to_string(),
                name: "Vestido Midi".to_string(),
                size: "M".to_string(),
                color: "Azul".to_string(),
                qty: 1,
                price: total,
            }],
            total,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_novo() {
        let repo = repo().await;
        let order = repo
            .create(sample_create(store_id(1), "1234", 50.0))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Novo);
        assert!(order.recovery_sent_at.is_none());
        assert_eq!(order.items.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_items() {
        let repo = repo().await;
        let mut data = sample_create(store_id(1), "1234", 50.0);
        data.items.clear();
        assert!(matches!(
            repo.create(data).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_status_filter_and_update() {
        let repo = repo().await;
        let order = repo
            .create(sample_create(store_id(1), "1234", 50.0))
            .await
            .unwrap();
        repo.create(sample_create(store_id(1), "5678", 30.0))
            .await
            .unwrap();

        let id = order.id.unwrap().to_string();
        let updated = repo
            .update_status(&id, OrderStatus::Confirmado)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmado);

        let novos = repo
            .find_by_store(&store_id(1), Some(OrderStatus::Novo), 50, 0)
            .await
            .unwrap();
        assert_eq!(novos.len(), 1);
        assert_eq!(novos[0].order_number, "5678");

        // Illegal transitions are persisted anyway — the gap is intentional
        let skipped = repo.update_status(&id, OrderStatus::Entregue).await.unwrap();
        assert_eq!(skipped.status, OrderStatus::Entregue);
    }

    #[tokio::test]
    async fn test_counts_and_revenue_exclude_cancelled() {
        let repo = repo().await;
        let a = repo
            .create(sample_create(store_id(1), "0001", 50.0))
            .await
            .unwrap();
        repo.create(sample_create(store_id(1), "0002", 30.0))
            .await
            .unwrap();
        repo.update_status(&a.id.unwrap().to_string(), OrderStatus::Cancelado)
            .await
            .unwrap();

        let now = chrono::Utc::now().timestamp_millis();
        let revenue = repo
            .revenue_between(&store_id(1), now - 60_000, now + 60_000)
            .await
            .unwrap();
        assert_eq!(revenue, 30.0);

        assert_eq!(
            repo.count_by_status(&store_id(1), OrderStatus::Novo)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_recovery_candidates() {
        let repo = repo().await;
        let order = repo
            .create(sample_create(store_id(1), "0001", 50.0))
            .await
            .unwrap();
        let id = order.id.unwrap().to_string();

        let now = chrono::Utc::now().timestamp_millis();
        // Fresh orders qualify once the cutoff includes them
        let candidates = repo
            .find_recovery_candidates(&store_id(1), now + 1000)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);

        // A stamped order never comes back
        let stamped = repo.mark_recovery_sent(&id).await.unwrap();
        assert!(stamped.recovery_sent_at.is_some());
        let candidates = repo
            .find_recovery_candidates(&store_id(1), now + 1000)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}
