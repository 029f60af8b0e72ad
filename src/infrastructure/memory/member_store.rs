//! In-memory member repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Member, MemberPatch, NewMember};
use crate::domain::repositories::MemberRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct MemberTable {
    rows: BTreeMap<u64, Member>,
    last_id: u64,
}

impl MemberTable {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.rows
            .values()
            .any(|m| Some(m.id) != except && m.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMemberRepository {
    table: RwLock<MemberTable>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_conflict(email: &str) -> AppError {
    AppError::conflict("Email already registered", json!({ "email": email }))
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn create(&self, new_member: NewMember) -> Result<Member, AppError> {
        let mut table = self.table.write().await;

        if table.email_taken(&new_member.email, None) {
            return Err(email_conflict(&new_member.email));
        }

        table.last_id += 1;
        let member = Member {
            id: table.last_id,
            name: new_member.name,
            email: new_member.email,
            age: new_member.age,
            created_at: Utc::now(),
        };
        table.rows.insert(member.id, member.clone());

        Ok(member)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Member>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<(Vec<Member>, usize), AppError> {
        let table = self.table.read().await;
        let page = table.rows.values().skip(skip).take(limit).cloned().collect();
        Ok((page, table.rows.len()))
    }

    async fn update(&self, id: u64, patch: MemberPatch) -> Result<Option<Member>, AppError> {
        let mut table = self.table.write().await;

        if let Some(ref email) = patch.email
            && table.email_taken(email, Some(id))
        {
            return Err(email_conflict(email));
        }

        Ok(table.rows.get_mut(&id).map(|member| {
            if let Some(name) = patch.name {
                member.name = name;
            }
            if let Some(email) = patch.email {
                member.email = email;
            }
            if let Some(age) = patch.age {
                member.age = Some(age);
            }
            member.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<bool, AppError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn all(&self) -> Result<Vec<Member>, AppError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}
