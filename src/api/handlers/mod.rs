//! HTTP request handlers, one module per lesson.

pub mod auth;
pub mod background;
pub mod books;
pub mod demo;
pub mod health;
pub mod inventory;
pub mod members;
pub mod ml;
pub mod shop;
pub mod todos;
pub mod validation;

pub use health::{health_handler, root_handler};
