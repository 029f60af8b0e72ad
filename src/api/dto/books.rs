//! DTOs for the book catalogue.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{BookFilter, BookPatch, BookStats, NewBook};
use crate::utils::patterns::ISBN;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub author: String,

    #[validate(range(min = 1000, max = 2100))]
    pub year: i64,

    #[validate(regex(path = *ISBN, message = "ISBN must be 13 digits"))]
    pub isbn: Option<String>,

    #[validate(length(max = 200))]
    pub publisher: Option<String>,

    pub description: Option<String>,
}

impl From<CreateBookRequest> for NewBook {
    fn from(req: CreateBookRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            year: req.year,
            isbn: req.isbn,
            publisher: req.publisher,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub author: Option<String>,

    #[validate(range(min = 1000, max = 2100))]
    pub year: Option<i64>,

    #[validate(regex(path = *ISBN, message = "ISBN must be 13 digits"))]
    pub isbn: Option<String>,

    #[validate(length(max = 200))]
    pub publisher: Option<String>,

    pub description: Option<String>,
}

impl From<UpdateBookRequest> for BookPatch {
    fn from(req: UpdateBookRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            year: req.year,
            isbn: req.isbn,
            publisher: req.publisher,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListBooksQuery {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,

    pub author: Option<String>,
    pub year: Option<i64>,
}

fn default_limit() -> i64 {
    100
}

impl From<ListBooksQuery> for BookFilter {
    fn from(q: ListBooksQuery) -> Self {
        Self {
            skip: q.skip,
            limit: q.limit,
            author: q.author.filter(|a| !a.is_empty()),
            year: q.year,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct YearRange {
    pub earliest: i64,
    pub latest: i64,
}

/// Summary shape: an empty catalogue only reports zero counts.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BookStatsResponse {
    Empty {
        total_books: i64,
        unique_authors: i64,
        years: Vec<i64>,
    },
    Populated {
        total_books: i64,
        unique_authors: i64,
        year_range: YearRange,
        years_covered: Vec<i64>,
    },
}

impl From<BookStats> for BookStatsResponse {
    fn from(stats: BookStats) -> Self {
        match (stats.total_books, stats.earliest_year, stats.latest_year) {
            (total, Some(earliest), Some(latest)) if total > 0 => Self::Populated {
                total_books: total,
                unique_authors: stats.unique_authors,
                year_range: YearRange { earliest, latest },
                years_covered: stats.years_covered,
            },
            _ => Self::Empty {
                total_books: 0,
                unique_authors: 0,
                years: Vec::new(),
            },
        }
    }
}
