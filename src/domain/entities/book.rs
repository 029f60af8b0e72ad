//! Book entity stored in SQLite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for inserting a book.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
}

/// Partial update of a book. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Listing filter with offset pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct BookFilter {
    pub skip: i64,
    pub limit: i64,
    /// Case-insensitive substring match on author.
    pub author: Option<String>,
    pub year: Option<i64>,
}

impl Default for BookFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            author: None,
            year: None,
        }
    }
}

/// Aggregate numbers over the whole catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookStats {
    pub total_books: i64,
    pub unique_authors: i64,
    pub earliest_year: Option<i64>,
    pub latest_year: Option<i64>,
    pub years_covered: Vec<i64>,
}
