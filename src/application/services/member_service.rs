//! Member management for the dependency-injection lesson.

use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::member::email_domain;
use crate::domain::entities::{Member, MemberPatch, NewMember};
use crate::domain::repositories::MemberRepository;
use crate::error::AppError;

/// Members grouped by email domain.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStats {
    pub total_users: usize,
    pub users_by_domain: BTreeMap<String, usize>,
}

/// Applies the business rules that sit on top of plain field validation:
/// the email domain allowlist and the no-digits-in-names rule.
pub struct MemberService<R: MemberRepository> {
    repository: Arc<R>,
    allowed_domains: Vec<String>,
}

fn member_not_found(id: u64) -> AppError {
    AppError::not_found(format!("User with ID {id} not found"), json!({ "id": id }))
}

impl<R: MemberRepository> MemberService<R> {
    pub fn new(repository: Arc<R>, allowed_domains: Vec<String>) -> Self {
        let allowed_domains = allowed_domains
            .into_iter()
            .map(|d| d.to_ascii_lowercase())
            .collect();

        Self {
            repository,
            allowed_domains,
        }
    }

    fn check_email(&self, email: &str) -> Result<(), AppError> {
        let domain = email_domain(email);
        if self.allowed_domains.iter().any(|d| *d == domain) {
            return Ok(());
        }

        Err(AppError::bad_request(
            format!("Email domain '{domain}' is not allowed"),
            json!({ "domain": domain, "allowed_domains": self.allowed_domains }),
        ))
    }

    fn check_name(name: &str) -> Result<(), AppError> {
        if name.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Name cannot contain numbers",
                json!({ "name": name }),
            ));
        }
        Ok(())
    }

    pub async fn create(&self, new_member: NewMember) -> Result<Member, AppError> {
        self.check_email(&new_member.email)?;
        Self::check_name(&new_member.name)?;

        self.repository.create(new_member).await
    }

    pub async fn list(&self, skip: usize, limit: usize) -> Result<(Vec<Member>, usize), AppError> {
        self.repository.list(skip, limit).await
    }

    pub async fn get(&self, id: u64) -> Result<Member, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| member_not_found(id))
    }

    pub async fn update(&self, id: u64, patch: MemberPatch) -> Result<Member, AppError> {
        if let Some(ref email) = patch.email {
            self.check_email(email)?;
        }
        if let Some(ref name) = patch.name {
            Self::check_name(name)?;
        }

        self.repository
            .update(id, patch)
            .await?
            .ok_or_else(|| member_not_found(id))
    }

    pub async fn delete(&self, id: u64) -> Result<(), AppError> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(member_not_found(id))
        }
    }

    pub async fn stats(&self) -> Result<MemberStats, AppError> {
        let members = self.repository.all().await?;

        let mut users_by_domain = BTreeMap::new();
        for member in &members {
            *users_by_domain.entry(member.email_domain()).or_insert(0) += 1;
        }

        Ok(MemberStats {
            total_users: members.len(),
            users_by_domain,
        })
    }
}
