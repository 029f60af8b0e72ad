//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs carry `validator` rules and convert into domain inputs via
//! `From`; response DTOs shape domain values for JSON.

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
