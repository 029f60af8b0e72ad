//! Repository traits for the e-commerce catalogue and orders.

use crate::domain::entities::{
    NewOrder, NewProduct, Order, OrderFilter, OrderStatus, Product, ProductFilter, ProductPatch,
};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, AppError>;

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

/// Order storage. Stock bookkeeping happens here so it shares the order's transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Atomically checks and decrements stock, then stores the order and its lines.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if a product does not exist
    /// - [`AppError::BadRequest`] if a product lacks stock
    async fn create(&self, new_order: NewOrder) -> Result<Order, AppError>;

    /// Loads an order together with its lines.
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError>;

    /// Lists orders without lines.
    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, AppError>;

    /// Moves the order from `from` to `to`. Returns `None` when the order is
    /// missing or no longer has status `from`.
    async fn update_status(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, AppError>;

    /// Sets the status to cancelled and returns each line's quantity to stock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when the order is shipped, delivered or
    /// already cancelled.
    async fn cancel(&self, id: i64) -> Result<Option<Order>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
