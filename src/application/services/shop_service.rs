//! Catalogue and order handling for the e-commerce lesson.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{
    NewOrder, NewProduct, Order, OrderFilter, OrderStatus, Product, ProductFilter, ProductPatch,
};
use crate::domain::jobs::{Job, JobQueue};
use crate::domain::repositories::{OrderRepository, ProductRepository};
use crate::error::AppError;

fn product_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Product with ID {id} not found"), json!({ "id": id }))
}

fn order_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Order with ID {id} not found"), json!({ "id": id }))
}

/// Shop operations. Order notifications go to the shared background queue;
/// a full queue is logged and does not undo a committed order.
pub struct ShopService<P: ProductRepository, O: OrderRepository> {
    products: Arc<P>,
    orders: Arc<O>,
    jobs: JobQueue,
}

impl<P: ProductRepository, O: OrderRepository> ShopService<P, O> {
    pub fn new(products: Arc<P>, orders: Arc<O>, jobs: JobQueue) -> Self {
        Self {
            products,
            orders,
            jobs,
        }
    }

    fn notify(&self, job: Job) {
        if let Err(e) = self.jobs.enqueue(job) {
            tracing::warn!(error = %e, "Order notification dropped");
        }
    }

    pub async fn create_product(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let product = self.products.create(new_product).await?;
        tracing::info!(product_id = product.id, "Product created");
        Ok(product)
    }

    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, AppError> {
        self.products.list(filter).await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product, AppError> {
        self.products
            .update(id, patch)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        if !self.products.delete(id).await? {
            return Err(product_not_found(id));
        }
        Ok(())
    }

    /// Places an order and queues the confirmation email.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if a product does not exist
    /// - [`AppError::BadRequest`] if a product lacks stock
    pub async fn place_order(&self, new_order: NewOrder) -> Result<Order, AppError> {
        let order = self.orders.create(new_order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = order.id, total = order.total_amount, "Order placed");

        self.notify(Job::OrderConfirmation {
            order_id: order.id,
            email: order.customer_email.clone(),
            total: order.total_amount,
        });

        Ok(order)
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, AppError> {
        self.orders.list(filter).await
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, AppError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// Changes the order status. Moving to `cancelled` goes through
    /// [`Self::cancel_order`] so the stock comes back.
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] for a transition out of `cancelled` or `delivered`,
    ///   or a cancellation of a shipped order
    /// - [`AppError::Conflict`] when the status changed while the update ran
    pub async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Order, AppError> {
        let current = self.get_order(id).await?;

        if !current.status.can_transition_to(status) {
            return Err(AppError::bad_request(
                format!(
                    "Cannot change order status from {} to {}",
                    current.status, status
                ),
                json!({ "order_id": id, "from": current.status, "to": status }),
            ));
        }

        let order = if status == OrderStatus::Cancelled {
            self.cancel_order(id).await?
        } else {
            self.orders
                .update_status(id, current.status, status)
                .await?
                .ok_or_else(|| {
                    AppError::conflict(
                        format!("Order {id} changed status during the update, retry"),
                        json!({ "order_id": id, "expected": current.status }),
                    )
                })?
        };

        self.notify(Job::StatusUpdate {
            order_id: order.id,
            email: order.customer_email.clone(),
            status: status.to_string(),
        });

        Ok(order)
    }

    /// Cancels the order and puts its quantities back in stock.
    pub async fn cancel_order(&self, id: i64) -> Result<Order, AppError> {
        let order = self
            .orders
            .cancel(id)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        tracing::info!(order_id = id, "Order cancelled");
        Ok(order)
    }

    pub async fn counts(&self) -> Result<(i64, i64), AppError> {
        Ok((self.products.count().await?, self.orders.count().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OrderItemRequest;
    use crate::domain::repositories::{MockOrderRepository, MockProductRepository};
    use chrono::Utc;

    fn order(id: i64, status: OrderStatus) -> Order {
        Order {
            id,
            customer_name: "Ann".to_string(),
            customer_email: "ann@example.com".to_string(),
            total_amount: 40.0,
            status,
            created_at: Utc::now(),
            items: Some(vec![]),
        }
    }

    fn service(
        products: MockProductRepository,
        orders: MockOrderRepository,
        jobs: JobQueue,
    ) -> ShopService<MockProductRepository, MockOrderRepository> {
        ShopService::new(Arc::new(products), Arc::new(orders), jobs)
    }

    #[tokio::test]
    async fn test_place_order_queues_confirmation() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .times(1)
            .returning(|_| Ok(order(1, OrderStatus::Pending)));

        let (jobs, mut rx) = JobQueue::channel(10);
        let service = service(MockProductRepository::new(), orders, jobs);

        service
            .place_order(NewOrder {
                customer_name: "Ann".to_string(),
                customer_email: "ann@example.com".to_string(),
                items: vec![OrderItemRequest {
                    product_id: 1,
                    quantity: 2,
                }],
            })
            .await
            .unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            Job::OrderConfirmation {
                order_id: 1,
                email: "ann@example.com".to_string(),
                total: 40.0,
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_order_status_is_frozen() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(order(id, OrderStatus::Cancelled))));
        orders.expect_update_status().times(0);

        let (jobs, _rx) = JobQueue::channel(10);
        let service = service(MockProductRepository::new(), orders, jobs);

        let err = service
            .update_order_status(5, OrderStatus::Pending)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot change order status from cancelled to pending"
        );
    }

    #[tokio::test]
    async fn test_status_update_queues_notification() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(order(id, OrderStatus::Pending))));
        orders
            .expect_update_status()
            .withf(|_, from, to| *from == OrderStatus::Pending && *to == OrderStatus::Shipped)
            .times(1)
            .returning(|id, _, to| Ok(Some(order(id, to))));

        let (jobs, mut rx) = JobQueue::channel(10);
        let service = service(MockProductRepository::new(), orders, jobs);

        let updated = service
            .update_order_status(2, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);

        match rx.recv().await.unwrap() {
            Job::StatusUpdate { status, .. } => assert_eq!(status, "shipped"),
            other => panic!("unexpected job {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let (jobs, _rx) = JobQueue::channel(10);
        let service = service(products, MockOrderRepository::new(), jobs);

        let err = service.get_product(99).await.unwrap_err();
        assert_eq!(err.to_string(), "Product with ID 99 not found");
    }

    #[tokio::test]
    async fn test_cancelled_status_goes_through_cancel() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(order(id, OrderStatus::Confirmed))));
        orders.expect_update_status().times(0);
        orders
            .expect_cancel()
            .times(1)
            .returning(|id| Ok(Some(order(id, OrderStatus::Cancelled))));

        let (jobs, mut rx) = JobQueue::channel(10);
        let service = service(MockProductRepository::new(), orders, jobs);

        let cancelled = service
            .update_order_status(3, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        match rx.recv().await.unwrap() {
            Job::StatusUpdate { status, .. } => assert_eq!(status, "cancelled"),
            other => panic!("unexpected job {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_status_change_is_conflict() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(order(id, OrderStatus::Pending))));
        orders.expect_update_status().returning(|_, _, _| Ok(None));

        let (jobs, mut rx) = JobQueue::channel(10);
        let service = service(MockProductRepository::new(), orders, jobs);

        let err = service
            .update_order_status(4, OrderStatus::Shipped)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(rx.try_recv().is_err());
    }
}
