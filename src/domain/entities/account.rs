//! Accounts, roles and scopes for the authentication lesson.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SCOPE_USERS_READ: &str = "users:read";
pub const SCOPE_USERS_WRITE: &str = "users:write";
pub const SCOPE_USERS_DELETE: &str = "users:delete";
pub const SCOPE_ITEMS_READ: &str = "items:read";
pub const SCOPE_ITEMS_WRITE: &str = "items:write";

/// Every scope a token can carry.
pub const ALL_SCOPES: &[&str] = &[
    SCOPE_USERS_READ,
    SCOPE_USERS_WRITE,
    SCOPE_USERS_DELETE,
    SCOPE_ITEMS_READ,
    SCOPE_ITEMS_WRITE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    /// Scopes granted to a freshly created account with this role.
    pub fn default_scopes(&self) -> Vec<String> {
        let scopes: &[&str] = match self {
            Role::Admin => ALL_SCOPES,
            Role::Manager => &[SCOPE_USERS_READ, SCOPE_ITEMS_READ, SCOPE_ITEMS_WRITE],
            Role::User => &[SCOPE_ITEMS_READ],
        };
        scopes.iter().map(|s| s.to_string()).collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            other => Err(format!("Invalid role: {other}")),
        }
    }
}

/// A registered account. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub scopes: Vec<String>,
    pub disabled: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub scopes: Vec<String>,
    pub disabled: bool,
    pub password_hash: String,
}

impl NewAccount {
    pub fn into_account(self, created_at: DateTime<Utc>) -> Account {
        Account {
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            scopes: self.scopes,
            disabled: self.disabled,
            password_hash: self.password_hash,
            created_at,
        }
    }
}

/// An item owned by an account, created through the scoped items endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedItem {
    pub id: u64,
    pub title: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Server-side record of an issued refresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTokenRecord {
    pub jti: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}
