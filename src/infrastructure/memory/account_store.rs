//! In-memory account and refresh-token repositories.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{Account, NewAccount, RefreshTokenRecord, Role};
use crate::domain::repositories::{AccountRepository, RefreshTokenRepository};
use crate::error::AppError;

/// Accounts keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<BTreeMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&new_account.username) {
            return Err(AppError::conflict(
                "Username already registered",
                json!({ "username": new_account.username }),
            ));
        }

        let account = new_account.into_account(Utc::now());
        accounts.insert(account.username.clone(), account.clone());

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.accounts.read().await.values().cloned().collect())
    }

    async fn update_role(
        &self,
        username: &str,
        role: Role,
        scopes: Vec<String>,
    ) -> Result<Option<Account>, AppError> {
        let mut accounts = self.accounts.write().await;

        Ok(accounts.get_mut(username).map(|account| {
            account.role = role;
            account.scopes = scopes;
            account.clone()
        }))
    }

    async fn delete(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.accounts.write().await.remove(username).is_some())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.accounts.read().await.len())
    }
}

/// Refresh tokens keyed by JWT id.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn store(&self, record: RefreshTokenRecord) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        let now = Utc::now();
        tokens.retain(|_, r| r.expires_at > now);
        tokens.insert(record.jti.clone(), record);
        Ok(())
    }

    async fn find(&self, jti: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        Ok(self.tokens.read().await.get(jti).cloned())
    }

    async fn revoke(&self, jti: &str) -> Result<bool, AppError> {
        let mut tokens = self.tokens.write().await;

        Ok(match tokens.get_mut(jti) {
            Some(record) if !record.revoked => {
                record.revoked = true;
                true
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_revoke_only_succeeds_once() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.store(RefreshTokenRecord {
            jti: "abc".to_string(),
            username: "alice".to_string(),
            expires_at: Utc::now() + Duration::days(1),
            revoked: false,
        })
        .await
        .unwrap();

        assert!(repo.revoke("abc").await.unwrap());
        assert!(!repo.revoke("abc").await.unwrap());
        assert!(!repo.revoke("missing").await.unwrap());
        assert!(repo.find("abc").await.unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = InMemoryAccountRepository::new();
        let account = NewAccount {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
            role: Role::User,
            scopes: Role::User.default_scopes(),
            disabled: false,
            password_hash: "hash".to_string(),
        };

        repo.create(account.clone()).await.unwrap();
        assert!(matches!(
            repo.create(account).await,
            Err(AppError::Conflict { .. })
        ));
    }
}
