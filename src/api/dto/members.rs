//! DTOs for the dependency-injection lesson.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Member, MemberPatch, NewMember};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 2, max = 50))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(range(max = 150))]
    pub age: Option<u8>,
}

impl From<CreateMemberRequest> for NewMember {
    fn from(req: CreateMemberRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 2, max = 50))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(range(max = 150))]
    pub age: Option<u8>,
}

impl From<UpdateMemberRequest> for MemberPatch {
    fn from(req: UpdateMemberRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListMembersQuery {
    #[serde(default)]
    pub skip: usize,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub users: Vec<Member>,
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
    pub requested_by: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteMemberResponse {
    pub message: String,
    pub deleted_by: String,
}

#[derive(Debug, Serialize)]
pub struct RateLimitStatusResponse {
    pub client: String,
    pub normal: TierStatus,
    pub strict: TierStatus,
    pub window_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct TierStatus {
    pub limit: u32,
    pub remaining: u32,
}
