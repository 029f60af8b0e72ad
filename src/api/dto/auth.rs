//! DTOs for registration, token issuance and account management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::services::auth_service::{Registration, check_password_strength};
use crate::domain::entities::{Account, Role};
use crate::utils::patterns::USERNAME;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50), regex(path = *USERNAME))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 100))]
    pub full_name: Option<String>,

    #[validate(custom(function = "strong_password"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

fn strong_password(password: &str) -> Result<(), ValidationError> {
    check_password_strength(password)
        .map_err(|msg| ValidationError::new("password_strength").with_message(msg.into()))
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            full_name: req.full_name,
            role: req.role,
            password: req.password,
        }
    }
}

/// OAuth2 password grant form.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenForm {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    /// Space-separated scopes.
    #[serde(default)]
    pub scope: String,
}

impl TokenForm {
    pub fn scopes(&self) -> Vec<String> {
        self.scope.split_whitespace().map(str::to_string).collect()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
}

/// Public view of an account; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub scopes: Vec<String>,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            role: account.role,
            scopes: account.scopes,
            disabled: account.disabled,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub accounts: usize,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub algorithm: &'static str,
}
