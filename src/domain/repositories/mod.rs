//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure`. Mock implementations are generated via `mockall`
//! for service tests.
//!
//! # Available Repositories
//!
//! - [`TodoRepository`] - Todo CRUD
//! - [`MemberRepository`] - Members of the dependency-injection lesson
//! - [`BookRepository`] - Book catalogue
//! - [`AccountRepository`] / [`RefreshTokenRepository`] - Authentication
//! - [`ProductRepository`] / [`OrderRepository`] - E-commerce

pub mod account_repository;
pub mod book_repository;
pub mod member_repository;
pub mod shop_repository;
pub mod todo_repository;

pub use account_repository::{AccountRepository, RefreshTokenRepository};
pub use book_repository::BookRepository;
pub use member_repository::MemberRepository;
pub use shop_repository::{OrderRepository, ProductRepository};
pub use todo_repository::TodoRepository;

#[cfg(test)]
pub use account_repository::{MockAccountRepository, MockRefreshTokenRepository};
#[cfg(test)]
pub use book_repository::MockBookRepository;
#[cfg(test)]
pub use member_repository::MockMemberRepository;
#[cfg(test)]
pub use shop_repository::{MockOrderRepository, MockProductRepository};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
