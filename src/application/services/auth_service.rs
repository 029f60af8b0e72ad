//! Password and JWT authentication for the auth lesson.
//!
//! Passwords are stored as argon2 PHC strings. Access and refresh tokens are
//! HS256 JWTs; every issued refresh token is recorded by its `jti` so it can be
//! rotated on use and revoked on logout.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::{SCOPE_ITEMS_READ, SCOPE_ITEMS_WRITE};
use crate::domain::entities::{Account, NewAccount, OwnedItem, RefreshTokenRecord, Role};
use crate::domain::repositories::{AccountRepository, RefreshTokenRepository};
use crate::error::AppError;

pub const DEMO_PASSWORD: &str = "secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims carried by both token types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub scopes: Vec<String>,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// An authenticated caller: the account plus the scopes its token carries.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account: Account,
    pub scopes: Vec<String>,
}

impl AuthContext {
    pub fn require_scope(&self, scope: &str) -> Result<(), AppError> {
        if self.scopes.iter().any(|s| s == scope) {
            return Ok(());
        }

        Err(AppError::forbidden(
            "Not enough permissions",
            json!({ "required_scope": scope, "token_scopes": self.scopes }),
        ))
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.account.role) {
            return Ok(());
        }

        let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        Err(AppError::forbidden(
            format!("Access denied. Required roles: {}", names.join(", ")),
            json!({ "required_roles": names, "role": self.account.role }),
        ))
    }
}

pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub password: String,
}

/// Checks the password policy: at least 8 characters with upper, lower and digit.
pub fn check_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit");
    }
    Ok(())
}

/// Hashes a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::fill(&mut salt_bytes).map_err(|e| {
        AppError::internal("Failed to generate salt", json!({ "reason": e.to_string() }))
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        AppError::internal("Failed to encode salt", json!({ "reason": e.to_string() }))
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })
}

pub fn verify_password(password: &str, phc: &str) -> bool {
    PasswordHash::new(phc)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            AppError::internal("Password hashing task failed", json!({ "reason": e.to_string() }))
        })?
}

async fn verify_blocking(password: String, phc: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &phc))
        .await
        .unwrap_or(false)
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Could not validate credentials", json!({}))
}

fn inactive_user() -> AppError {
    AppError::bad_request("Inactive user", json!({}))
}

fn user_not_found(username: &str) -> AppError {
    AppError::not_found("User not found", json!({ "username": username }))
}

#[derive(Debug, Default)]
struct ItemStore {
    items: Vec<OwnedItem>,
    last_id: u64,
}

pub struct AuthService<A: AccountRepository, T: RefreshTokenRepository> {
    accounts: Arc<A>,
    refresh_tokens: Arc<T>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    items: RwLock<ItemStore>,
}

impl<A: AccountRepository, T: RefreshTokenRepository> AuthService<A, T> {
    pub fn new(
        accounts: Arc<A>,
        refresh_tokens: Arc<T>,
        jwt_secret: &str,
        access_ttl_minutes: i64,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            accounts,
            refresh_tokens,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
            items: RwLock::new(ItemStore::default()),
        }
    }

    /// Creates alice (admin), bob (user), charlie (user with write access)
    /// and dave (disabled), all with the password `secret`.
    pub async fn seed_demo_accounts(&self) -> Result<(), AppError> {
        let phc = hash_blocking(DEMO_PASSWORD.to_string()).await?;

        let seeds = [
            ("alice", "Alice Wonderland", Role::Admin, Role::Admin.default_scopes(), false),
            ("bob", "Bob Builder", Role::User, Role::User.default_scopes(), false),
            (
                "charlie",
                "Charlie Chocolate",
                Role::User,
                vec![SCOPE_ITEMS_READ.to_string(), SCOPE_ITEMS_WRITE.to_string()],
                false,
            ),
            ("dave", "Dave Disabled", Role::User, Role::User.default_scopes(), true),
        ];

        for (username, full_name, role, scopes, disabled) in seeds {
            if self.accounts.find_by_username(username).await?.is_some() {
                continue;
            }

            self.accounts
                .create(NewAccount {
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                    full_name: Some(full_name.to_string()),
                    role,
                    scopes,
                    disabled,
                    password_hash: phc.clone(),
                })
                .await?;
        }

        tracing::info!("Seeded demo accounts");
        Ok(())
    }

    /// # Errors
    ///
    /// - [`AppError::Forbidden`] when asking for the admin role
    /// - [`AppError::Conflict`] when the username is taken
    pub async fn register(&self, registration: Registration) -> Result<Account, AppError> {
        if registration.role == Role::Admin {
            return Err(AppError::forbidden(
                "Cannot self-assign admin role",
                json!({ "role": registration.role }),
            ));
        }

        let password_hash = hash_blocking(registration.password).await?;

        let account = self
            .accounts
            .create(NewAccount {
                username: registration.username,
                email: registration.email,
                full_name: registration.full_name,
                role: registration.role,
                scopes: registration.role.default_scopes(),
                disabled: false,
                password_hash,
            })
            .await?;

        tracing::info!(username = %account.username, role = %account.role, "Account registered");
        Ok(account)
    }

    /// Password grant. An empty `requested_scopes` grants every scope of the account,
    /// otherwise the intersection.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        requested_scopes: &[String],
    ) -> Result<TokenPair, AppError> {
        let incorrect =
            || AppError::unauthorized("Incorrect username or password", json!({}));

        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or_else(incorrect)?;

        if !verify_blocking(password.to_string(), account.password_hash.clone()).await {
            tracing::warn!(username, "Failed login attempt");
            return Err(incorrect());
        }

        if account.disabled {
            return Err(inactive_user());
        }

        let scopes = if requested_scopes.is_empty() {
            account.scopes.clone()
        } else {
            requested_scopes
                .iter()
                .filter(|s| account.has_scope(s))
                .cloned()
                .collect()
        };

        self.issue_tokens(&account, scopes).await
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "reason": e.to_string() }))
        })
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                invalid_credentials()
            })
    }

    async fn issue_tokens(
        &self,
        account: &Account,
        scopes: Vec<String>,
    ) -> Result<TokenPair, AppError> {
        let now = Utc::now();

        let access = Claims {
            sub: account.username.clone(),
            role: account.role,
            scopes: scopes.clone(),
            token_type: TokenType::Access,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let refresh_expires_at = now + self.refresh_ttl;
        let refresh = Claims {
            token_type: TokenType::Refresh,
            exp: refresh_expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            scopes,
            ..access.clone()
        };

        let pair = TokenPair {
            access_token: self.encode_claims(&access)?,
            refresh_token: self.encode_claims(&refresh)?,
            token_type: "bearer",
            expires_in: self.access_ttl.num_seconds(),
        };

        self.refresh_tokens
            .store(RefreshTokenRecord {
                jti: refresh.jti,
                username: account.username.clone(),
                expires_at: refresh_expires_at,
                revoked: false,
            })
            .await?;

        Ok(pair)
    }

    fn decode_refresh(&self, refresh_token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_claims(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AppError::unauthorized("Invalid refresh token", json!({})));
        }
        Ok(claims)
    }

    /// Rotates a refresh token: the presented one is revoked and a new pair issued.
    /// Presenting an already-rotated token fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decode_refresh(refresh_token)?;

        let revoked = self.refresh_tokens.revoke(&claims.jti).await?;
        if !revoked {
            tracing::warn!(username = %claims.sub, "Refresh token reuse detected");
            return Err(AppError::unauthorized(
                "Refresh token has been revoked",
                json!({}),
            ));
        }

        let account = self
            .accounts
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(invalid_credentials)?;

        if account.disabled {
            return Err(inactive_user());
        }

        let scopes = claims
            .scopes
            .into_iter()
            .filter(|s| account.has_scope(s))
            .collect();

        self.issue_tokens(&account, scopes).await
    }

    /// Revokes a refresh token belonging to `username`.
    pub async fn logout(&self, username: &str, refresh_token: &str) -> Result<(), AppError> {
        let claims = self.decode_refresh(refresh_token)?;

        if claims.sub != username {
            return Err(AppError::unauthorized("Invalid refresh token", json!({})));
        }

        self.refresh_tokens.revoke(&claims.jti).await?;
        tracing::info!(username, "Logged out");
        Ok(())
    }

    /// Resolves a bearer access token into the calling account.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for a bad, expired or refresh token, or an unknown account
    /// - [`AppError::BadRequest`] for a disabled account
    pub async fn authenticate(&self, access_token: &str) -> Result<AuthContext, AppError> {
        let claims = self.decode_claims(access_token)?;
        if claims.token_type != TokenType::Access {
            return Err(invalid_credentials());
        }

        let account = self
            .accounts
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(invalid_credentials)?;

        if account.disabled {
            return Err(inactive_user());
        }

        Ok(AuthContext {
            account,
            scopes: claims.scopes,
        })
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.accounts.list().await
    }

    pub async fn get_account(&self, username: &str) -> Result<Account, AppError> {
        self.accounts
            .find_by_username(username)
            .await?
            .ok_or_else(|| user_not_found(username))
    }

    /// Changes the role and resets scopes to that role's defaults.
    pub async fn update_role(&self, username: &str, role: Role) -> Result<Account, AppError> {
        let account = self
            .accounts
            .update_role(username, role, role.default_scopes())
            .await?
            .ok_or_else(|| user_not_found(username))?;

        tracing::info!(username, role = %role, "Role updated");
        Ok(account)
    }

    pub async fn delete_account(&self, actor: &str, username: &str) -> Result<(), AppError> {
        if actor == username {
            return Err(AppError::bad_request(
                "Cannot delete yourself",
                json!({ "username": username }),
            ));
        }

        if !self.accounts.delete(username).await? {
            return Err(user_not_found(username));
        }

        Ok(())
    }

    pub async fn account_count(&self) -> Result<usize, AppError> {
        self.accounts.count().await
    }

    pub async fn create_item(&self, owner: &str, title: String) -> OwnedItem {
        let mut store = self.items.write().await;
        store.last_id += 1;

        let item = OwnedItem {
            id: store.last_id,
            title,
            owner: owner.to_string(),
            created_at: Utc::now(),
        };
        store.items.push(item.clone());
        item
    }

    pub async fn items_for(&self, owner: &str) -> Vec<OwnedItem> {
        self.items
            .read()
            .await
            .items
            .iter()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect()
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
