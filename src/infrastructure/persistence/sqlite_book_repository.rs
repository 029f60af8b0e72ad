//! SQLite implementation of the book repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::{Book, BookFilter, BookPatch, BookStats, NewBook};
use crate::domain::repositories::BookRepository;
use crate::error::{AppError, map_sqlx_error};

const BOOK_COLUMNS: &str =
    "id, title, author, year, isbn, publisher, description, created_at, updated_at";

pub struct SqliteBookRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteBookRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn isbn_conflict(isbn: Option<&str>) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| match map_sqlx_error(e) {
        AppError::Conflict { .. } => AppError::conflict(
            format!("Book with ISBN {} already exists", isbn.unwrap_or_default()),
            json!({ "isbn": isbn }),
        ),
        other => other,
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    total_books: i64,
    unique_authors: i64,
    earliest_year: Option<i64>,
    latest_year: Option<i64>,
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn create(&self, new_book: NewBook) -> Result<Book, AppError> {
        let now = Utc::now();

        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year, isbn, publisher, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&new_book.title)
        .bind(&new_book.author)
        .bind(new_book.year)
        .bind(&new_book.isbn)
        .bind(&new_book.publisher)
        .bind(&new_book.description)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(isbn_conflict(new_book.isbn.as_deref()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, AppError> {
        let book =
            sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(book)
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        let book =
            sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?"))
                .bind(isbn)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(book)
    }

    async fn list(&self, filter: BookFilter) -> Result<Vec<Book>, AppError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM books WHERE 1 = 1"));

        if let Some(author) = filter.author {
            qb.push(" AND lower(author) LIKE ")
                .push_bind(format!("%{}%", author.to_lowercase()));
        }
        if let Some(year) = filter.year {
            qb.push(" AND year = ").push_bind(year);
        }

        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);

        let books = qb
            .build_query_as::<Book>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(books)
    }

    async fn update(&self, id: i64, patch: BookPatch) -> Result<Option<Book>, AppError> {
        let isbn = patch.isbn.clone();

        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET
                title       = COALESCE(?, title),
                author      = COALESCE(?, author),
                year        = COALESCE(?, year),
                isbn        = COALESCE(?, isbn),
                publisher   = COALESCE(?, publisher),
                description = COALESCE(?, description),
                updated_at  = ?
             WHERE id = ?
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.year)
        .bind(patch.isbn)
        .bind(patch.publisher)
        .bind(patch.description)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(isbn_conflict(isbn.as_deref()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<BookStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            "SELECT COUNT(*) AS total_books,
                    COUNT(DISTINCT author) AS unique_authors,
                    MIN(year) AS earliest_year,
                    MAX(year) AS latest_year
             FROM books",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        let years_covered: Vec<i64> =
            sqlx::query_scalar("SELECT DISTINCT year FROM books ORDER BY year")
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(BookStats {
            total_books: row.total_books,
            unique_authors: row.unique_authors,
            earliest_year: row.earliest_year,
            latest_year: row.latest_year,
            years_covered,
        })
    }
}
