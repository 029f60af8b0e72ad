//! API key authentication for the dependency-injection lesson.

use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::json;
use sha2::Sha256;
use std::collections::HashMap;

use crate::config::ApiKeyEntry;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// The caller resolved from an `X-API-Key` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyIdentity {
    pub name: String,
    pub role: String,
}

impl ApiKeyIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Registry of API keys.
///
/// Raw keys are never kept in memory after startup: the registry is indexed
/// by the HMAC-SHA256 of each key, keyed with the server secret.
pub struct ApiKeyService {
    mac: HmacSha256,
    identities: HashMap<String, ApiKeyIdentity>,
}

impl ApiKeyService {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the HMAC key cannot be initialised.
    pub fn new(signing_secret: &str, entries: &[ApiKeyEntry]) -> Result<Self, AppError> {
        let mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).map_err(|e| {
            AppError::internal("Invalid API key secret", json!({ "reason": e.to_string() }))
        })?;

        let mut service = Self {
            mac,
            identities: HashMap::with_capacity(entries.len()),
        };

        for entry in entries {
            let digest = service.hash_key(&entry.key);
            service.identities.insert(
                digest,
                ApiKeyIdentity {
                    name: entry.name.clone(),
                    role: entry.role.clone(),
                },
            );
        }

        Ok(service)
    }

    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_key(&self, key: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(key.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when the key is missing or unknown.
    pub fn authenticate(&self, key: Option<&str>) -> Result<ApiKeyIdentity, AppError> {
        let key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
            AppError::unauthorized("API key is missing", json!({ "header": "X-API-Key" }))
        })?;

        self.identities
            .get(&self.hash_key(key))
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Invalid API key", json!({})))
    }

    pub fn key_count(&self) -> usize {
        self.identities.len()
    }
}
