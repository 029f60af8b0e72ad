//! Repository trait for members of the dependency-injection lesson.

use crate::domain::entities::{Member, MemberPatch, NewMember};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_member: NewMember) -> Result<Member, AppError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Member>, AppError>;

    /// Returns one page of members plus the total count.
    async fn list(&self, skip: usize, limit: usize) -> Result<(Vec<Member>, usize), AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email belongs to another member.
    async fn update(&self, id: u64, patch: MemberPatch) -> Result<Option<Member>, AppError>;

    async fn delete(&self, id: u64) -> Result<bool, AppError>;

    async fn all(&self) -> Result<Vec<Member>, AppError>;
}
