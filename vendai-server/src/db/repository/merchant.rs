//! Merchant Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Merchant;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MERCHANT_TABLE: &str = "merchant";

#[derive(Clone)]
pub struct MerchantRepository {
    base: BaseRepository,
}

impl MerchantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find merchant by email (login / duplicate check)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Merchant>> {
        let email = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM merchant WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let merchants: Vec<Merchant> = result.take(0)?;
        Ok(merchants.into_iter().next())
    }

    /// Find merchant by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Merchant>> {
        let merchant: Option<Merchant> = self.base.db().select(id.clone()).await?;
        Ok(merchant)
    }

    /// Create a new merchant account
    pub async fn create(&self, email: String, hash_pass: String) -> RepoResult<Merchant> {
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Merchant '{}' already exists",
                email
            )));
        }

        let merchant = Merchant::new(email, hash_pass, self.base.now_millis());
        let created: Option<Merchant> = self
            .base
            .db()
            .create(MERCHANT_TABLE)
            .content(merchant)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create merchant".to_string()))
    }

    /// Link the merchant to its freshly created store
    pub async fn set_store(&self, merchant_id: &RecordId, store_id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $merchant SET store = $store")
            .bind(("merchant", merchant_id.clone()))
            .bind(("store", store_id.clone()))
            .await?;
        Ok(())
    }
}
