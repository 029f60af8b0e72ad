//! # API Tutorials
//!
//! A collection of small REST API lessons served from one Axum application
//! backed by SQLite.
//!
//! ## Architecture
//!
//! The crate keeps a clean layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Lesson entities, repository traits, background jobs
//! - **Application Layer** ([`application`]) - Business rules per lesson
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite, in-memory stores, Redis cache
//! - **API Layer** ([`api`]) - Handlers, DTOs, extractors and middleware
//!
//! ## Lessons
//!
//! | Prefix         | Topic                                          |
//! |----------------|------------------------------------------------|
//! | `/todos`       | In-memory CRUD                                 |
//! | `/validation`  | Field, path, query and nested validation       |
//! | `/di`          | API key dependencies and per-client rate limits|
//! | `/books`       | SQLite CRUD with a read-through cache          |
//! | `/auth`        | JWT access/refresh tokens, roles and scopes    |
//! | `/background`  | Fire-and-forget jobs and the task log          |
//! | `/middleware`  | Timing headers, compression, echo              |
//! | `/errors`      | Structured error envelopes                     |
//! | `/shop`        | Products, orders and stock bookkeeping         |
//! | `/ml`          | Linear model inference with history            |
//!
//! ## Quick Start
//!
//! ```bash
//! export JWT_SECRET="$(cargo run --bin admin -- secret generate --raw)"
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run
//! ```
//!
//! Migrations run at startup.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, BookService, InventoryService, MlService, ShopService, TodoService,
    };
    pub use crate::config::Config;
    pub use crate::error::AppError;
    pub use crate::routes::build_router;
    pub use crate::state::AppState;
}
