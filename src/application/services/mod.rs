//! Business logic services for the application layer.

pub mod api_key_service;
pub mod auth_service;
pub mod book_service;
pub mod inventory_service;
pub mod member_service;
pub mod ml_service;
pub mod rate_limit_service;
pub mod shop_service;
pub mod todo_service;

pub use api_key_service::{ApiKeyIdentity, ApiKeyService};
pub use auth_service::{AuthContext, AuthService};
pub use book_service::BookService;
pub use inventory_service::InventoryService;
pub use member_service::MemberService;
pub use ml_service::MlService;
pub use rate_limit_service::{RateLimitService, RateTier};
pub use shop_service::ShopService;
pub use todo_service::TodoService;
