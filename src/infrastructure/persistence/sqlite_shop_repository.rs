//! SQLite implementations of the product and order repositories.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::{
    NewOrder, NewProduct, Order, OrderFilter, OrderLine, OrderStatus, Product, ProductFilter,
    ProductPatch,
};
use crate::domain::repositories::{OrderRepository, ProductRepository};
use crate::error::AppError;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category, created_at";
const ORDER_COLUMNS: &str = "id, customer_name, customer_email, total_amount, status, created_at";

pub struct SqliteProductRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteProductRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, stock, category, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(new_product.stock)
        .bind(&new_product.category)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(product)
    }

    async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, AppError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1"));

        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category);
        }
        if let Some(min_price) = filter.min_price {
            qb.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND price <= ").push_bind(max_price);
        }
        if filter.in_stock {
            qb.push(" AND stock > 0");
        }

        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(products)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name        = COALESCE(?, name),
                description = COALESCE(?, description),
                price       = COALESCE(?, price),
                stock       = COALESCE(?, stock),
                category    = COALESCE(?, category)
             WHERE id = ?
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.stock)
        .bind(patch.category)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

/// Orders and their lines.
///
/// Creation and cancellation each run in a single transaction so stock
/// never drifts from the persisted orders.
pub struct SqliteOrderRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteOrderRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

async fn fetch_lines(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Vec<OrderLine>, AppError> {
    let lines = sqlx::query_as::<_, OrderLine>(
        "SELECT product_id, product_name, quantity, price_at_purchase,
                quantity * price_at_purchase AS subtotal
         FROM order_items
         WHERE order_id = ?
         ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;

    Ok(lines)
}

async fn fetch_order(conn: &mut SqliteConnection, id: i64) -> Result<Option<Order>, AppError> {
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await?;

    Ok(order)
}

fn cannot_cancel(id: i64, status: OrderStatus) -> AppError {
    AppError::bad_request(
        format!("Cannot cancel order with status {status}"),
        json!({ "order_id": id, "status": status }),
    )
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn create(&self, new_order: NewOrder) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut lines = Vec::with_capacity(new_order.items.len());
        let mut total = 0.0;

        for item in &new_order.items {
            let product = sqlx::query_as::<_, Product>(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
            ))
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("Product with ID {} not found", item.product_id),
                    json!({ "product_id": item.product_id }),
                )
            })?;

            let reserved =
                sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?")
                    .bind(item.quantity)
                    .bind(item.product_id)
                    .bind(item.quantity)
                    .execute(&mut *tx)
                    .await?;

            if reserved.rows_affected() == 0 {
                return Err(AppError::bad_request(
                    format!(
                        "Insufficient stock for {}. Available: {}, Requested: {}",
                        product.name, product.stock, item.quantity
                    ),
                    json!({
                        "product_id": product.id,
                        "available": product.stock,
                        "requested": item.quantity,
                    }),
                ));
            }

            let subtotal = product.price * item.quantity as f64;
            total += subtotal;
            lines.push(OrderLine {
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                price_at_purchase: product.price,
                subtotal,
            });
        }

        let mut order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (customer_name, customer_email, total_amount, status, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&new_order.customer_name)
        .bind(&new_order.customer_email)
        .bind(total)
        .bind(OrderStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, quantity, price_at_purchase)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.price_at_purchase)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        order.items = Some(lines);
        Ok(order)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let Some(mut order) = fetch_order(&mut conn, id).await? else {
            return Ok(None);
        };
        order.items = Some(fetch_lines(&mut conn, id).await?);

        Ok(Some(order))
    }

    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, AppError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));

        if let Some(status) = filter.status {
            qb.push(" WHERE status = ").push_bind(status);
        }

        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);

        let orders = qb
            .build_query_as::<Order>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let updated = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(&mut *conn)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let mut order = fetch_order(&mut conn, id).await?;
        if let Some(ref mut order) = order {
            order.items = Some(fetch_lines(&mut conn, id).await?);
        }

        Ok(order)
    }

    async fn cancel(&self, id: i64) -> Result<Option<Order>, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(order) = fetch_order(&mut tx, id).await? else {
            return Ok(None);
        };

        if !order.status.can_cancel() {
            return Err(cannot_cancel(id, order.status));
        }

        // only the writer that moves the status off its read value restores stock
        let claimed = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(OrderStatus::Cancelled)
            .bind(id)
            .bind(order.status)
            .execute(&mut *tx)
            .await?;

        if claimed.rows_affected() == 0 {
            let current = fetch_order(&mut tx, id).await?.map_or(order.status, |o| o.status);
            return Err(cannot_cancel(id, current));
        }

        let lines = fetch_lines(&mut tx, id).await?;
        for line in &lines {
            sqlx::query("UPDATE products SET stock = stock + ? WHERE id = ?")
                .bind(line.quantity)
                .bind(line.product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(Order {
            status: OrderStatus::Cancelled,
            items: Some(lines),
            ..order
        }))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
