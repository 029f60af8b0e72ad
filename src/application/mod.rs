//! Application layer services implementing business logic.
//!
//! Services consume repository traits and hold the rules of each lesson
//! module; HTTP handlers stay thin and delegate here.
//!
//! # Available Services
//!
//! - [`services::TodoService`] - Todo CRUD
//! - [`services::MemberService`] and [`services::ApiKeyService`] - Dependency-injection lesson
//! - [`services::RateLimitService`] - Keyed per-client request limits
//! - [`services::BookService`] - Book catalogue with cache-aside reads
//! - [`services::AuthService`] - Passwords, JWT issuance and refresh rotation
//! - [`services::InventoryService`] - Exception-handling lesson inventory
//! - [`services::ShopService`] - Products and transactional orders
//! - [`services::MlService`] - Model registry and prediction history

pub mod services;
