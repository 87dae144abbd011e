//! Merchant Model
//!
//! 商家账号，一个商家拥有一家店铺

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Merchant ID type
pub type MerchantId = RecordId;

/// Merchant account (store owner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Merchant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MerchantId>,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// The store this merchant owns (set right after registration)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub store: Option<RecordId>,
    #[serde(default)]
    pub created_at: i64,
}

impl Merchant {
    pub fn new(email: String, hash_pass: String, created_at: i64) -> Self {
        Self {
            id: None,
            email,
            hash_pass,
            store: None,
            created_at,
        }
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = Merchant::hash_password("segredo123").unwrap();
        let merchant = Merchant::new("ana@bellamoda.com".to_string(), hash, 0);

        assert!(merchant.verify_password("segredo123").unwrap());
        assert!(!merchant.verify_password("errada").unwrap());
    }

    #[test]
    fn test_hash_pass_never_serialized() {
        let merchant = Merchant::new("ana@bellamoda.com".to_string(), "$argon2$x".to_string(), 0);
        let json = serde_json::to_string(&merchant).unwrap();
        assert!(!json.contains("hash_pass"));
        assert!(!json.contains("argon2"));
    }
}
