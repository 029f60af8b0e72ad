//! Core domain entities for every lesson module.
//!
//! Entities are plain data structures. Creation inputs live in `New*` structs,
//! partial updates in `*Patch` structs where `None` means "leave unchanged".

pub mod account;
pub mod book;
pub mod inventory;
pub mod member;
pub mod ml_model;
pub mod order;
pub mod product;
pub mod todo;

pub use account::{Account, NewAccount, OwnedItem, RefreshTokenRecord, Role};
pub use book::{Book, BookFilter, BookPatch, BookStats, NewBook};
pub use inventory::{InventoryItem, NewInventoryItem, StockOrder};
pub use member::{Member, MemberPatch, NewMember};
pub use ml_model::{FeatureMismatch, LinearModel, PredictionRecord};
pub use order::{NewOrder, Order, OrderFilter, OrderItemRequest, OrderLine, OrderStatus};
pub use product::{NewProduct, Product, ProductFilter, ProductPatch};
pub use todo::{NewTodo, Todo, TodoPatch};
