//! SQLite repository implementations.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`), dynamic filters
//! are assembled with [`sqlx::QueryBuilder`].
//!
//! # Repositories
//!
//! - [`SqliteBookRepository`] - Book catalogue
//! - [`SqliteProductRepository`] - Shop products
//! - [`SqliteOrderRepository`] - Shop orders with transactional stock handling

pub mod sqlite_book_repository;
pub mod sqlite_shop_repository;

pub use sqlite_book_repository::SqliteBookRepository;
pub use sqlite_shop_repository::{SqliteOrderRepository, SqliteProductRepository};
