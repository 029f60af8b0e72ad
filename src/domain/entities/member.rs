//! Member record used by the dependency-injection lesson.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Domain part of the email address, lowercased.
    pub fn email_domain(&self) -> String {
        email_domain(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u8>,
}

/// Returns everything after the last `@`, lowercased, or an empty string.
pub fn email_domain(email: &str) -> String {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("Jane@Gmail.com"), "gmail.com");
        assert_eq!(email_domain("no-at-sign"), "");
    }
}
