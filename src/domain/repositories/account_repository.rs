//! Repository traits for accounts and refresh tokens.

use crate::domain::entities::{Account, NewAccount, RefreshTokenRecord, Role};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username is taken.
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;

    async fn list(&self) -> Result<Vec<Account>, AppError>;

    /// Sets the role and replaces the scopes. Returns `Ok(None)` if unknown.
    async fn update_role(
        &self,
        username: &str,
        role: Role,
        scopes: Vec<String>,
    ) -> Result<Option<Account>, AppError>;

    async fn delete(&self, username: &str) -> Result<bool, AppError>;

    async fn count(&self) -> Result<usize, AppError>;
}

/// Server-side registry of issued refresh tokens, keyed by JWT id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn store(&self, record: RefreshTokenRecord) -> Result<(), AppError>;

    async fn find(&self, jti: &str) -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Marks the token revoked. Returns `Ok(true)` if it was active before the call.
    async fn revoke(&self, jti: &str) -> Result<bool, AppError>;
}
