//! Store Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Store, StoreUpdate};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const STORE_TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find store by public slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Store>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM store WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let stores: Vec<Store> = result.take(0)?;
        Ok(stores.into_iter().next())
    }

    /// Find store by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Store>> {
        let store: Option<Store> = self.base.db().select(id.clone()).await?;
        Ok(store)
    }

    /// Whether a slug is already taken
    pub async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    /// Create a new store
    pub async fn create(&self, mut store: Store) -> RepoResult<Store> {
        if self.slug_exists(&store.slug).await? {
            return Err(RepoError::Duplicate(format!(
                "Store slug '{}' already exists",
                store.slug
            )));
        }

        store.created_at = self.base.now_millis();
        let created: Option<Store> = self.base.db().create(STORE_TABLE).content(store).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }

    /// Update store profile/settings. The slug is immutable and never part
    /// of the update payload.
    pub async fn update(&self, id: &RecordId, data: StoreUpdate) -> RepoResult<Store> {
        self.base
            .db()
            .query("UPDATE $store MERGE $data")
            .bind(("store", id.clone()))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::StoreSettings;

    async fn repo() -> StoreRepository {
        let service = DbService::memory().await.unwrap();
        StoreRepository::new(service.db)
    }

    fn sample_store(slug: &str) -> Store {
        Store::new(
            "merchant:m1".parse().unwrap(),
            slug.to_string(),
            "Bella Moda".to_string(),
            "5511988887777".to_string(),
            0,
        )
    }

    #[tokio::test]
    async fn test_create_and_find_by_slug() {
        let repo = repo().await;
        let created = repo.create(sample_store("bella-moda")).await.unwrap();
        assert!(created.id.is_some());
        assert!(created.created_at > 0);

        let found = repo.find_by_slug("bella-moda").await.unwrap().unwrap();
        assert_eq!(found.name, "Bella Moda");
        assert!(repo.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let repo = repo().await;
        repo.create(sample_store("bella-moda")).await.unwrap();
        let err = repo.create(sample_store("bella-moda")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_merges_settings_and_keeps_slug() {
        let repo = repo().await;
        let created = repo.create(sample_store("bella-moda")).await.unwrap();
        let id = created.id.unwrap();

        let update = StoreUpdate {
            name: Some("Bella Moda Boutique".to_string()),
            settings: Some(StoreSettings {
                frete_info: Some("Envio em 24h".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let updated = repo.update(&id, update).await.unwrap();
        assert_eq!(updated.name, "Bella Moda Boutique");
        assert_eq!(updated.slug, "bella-moda");
        assert_eq!(updated.settings.frete_info.as_deref(), Some("Envio em 24h"));
        assert_eq!(updated.whatsapp, "5511988887777");
    }
}
