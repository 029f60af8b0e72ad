//! Process-local repository implementations.
//!
//! Each store guards its data with a `tokio::sync::RwLock`; compound
//! check-then-write operations run under a single write guard.

pub mod account_store;
pub mod member_store;
pub mod todo_store;

pub use account_store::{InMemoryAccountRepository, InMemoryRefreshTokenRepository};
pub use member_store::InMemoryMemberRepository;
pub use todo_store::InMemoryTodoRepository;
