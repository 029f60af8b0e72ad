//! Stock-keeping items for the exception-handling lesson.

use axum::http::StatusCode;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{InventoryItem, NewInventoryItem, StockOrder};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Inventory {
    items: BTreeMap<u64, InventoryItem>,
    last_item_id: u64,
    last_order_id: u64,
}

impl Inventory {
    fn insert(&mut self, new_item: NewInventoryItem) -> InventoryItem {
        self.last_item_id += 1;
        let item = InventoryItem {
            id: self.last_item_id,
            name: new_item.name,
            price: new_item.price,
            quantity: new_item.quantity,
            category: new_item.category.to_lowercase(),
        };
        self.items.insert(item.id, item.clone());
        item
    }
}

fn item_not_found(item_id: u64) -> AppError {
    AppError::coded(
        StatusCode::NOT_FOUND,
        "item_not_found",
        format!("Item with id {item_id} not found"),
        json!({ "item_id": item_id }),
    )
}

/// Every failure here has its own error code so clients can tell them apart
/// without parsing messages.
pub struct InventoryService {
    inventory: RwLock<Inventory>,
}

impl InventoryService {
    /// Inventory preloaded with a laptop, a book and a t-shirt.
    pub fn with_seed_items() -> Self {
        let mut inventory = Inventory::default();
        for (name, price, quantity, category) in [
            ("Laptop", 999.99, 10, "electronics"),
            ("Rust Book", 45.00, 50, "books"),
            ("T-Shirt", 20.00, 100, "clothing"),
        ] {
            inventory.insert(NewInventoryItem {
                name: name.to_string(),
                price,
                quantity,
                category: category.to_string(),
            });
        }

        Self {
            inventory: RwLock::new(inventory),
        }
    }

    pub async fn list(&self) -> Vec<InventoryItem> {
        self.inventory.read().await.items.values().cloned().collect()
    }

    pub async fn get(&self, item_id: u64) -> Result<InventoryItem, AppError> {
        self.inventory
            .read()
            .await
            .items
            .get(&item_id)
            .cloned()
            .ok_or_else(|| item_not_found(item_id))
    }

    /// # Errors
    ///
    /// Returns `item_already_exists` (409) when the name is taken, ignoring case.
    pub async fn create(&self, new_item: NewInventoryItem) -> Result<InventoryItem, AppError> {
        let mut inventory = self.inventory.write().await;

        if inventory
            .items
            .values()
            .any(|i| i.name.eq_ignore_ascii_case(&new_item.name))
        {
            return Err(AppError::coded(
                StatusCode::CONFLICT,
                "item_already_exists",
                format!("Item with name '{}' already exists", new_item.name),
                json!({ "item_name": new_item.name }),
            ));
        }

        let item = inventory.insert(new_item);
        tracing::info!(item_id = item.id, name = %item.name, "Inventory item created");
        Ok(item)
    }

    /// Decrements stock and returns the placed order.
    pub async fn place_order(&self, item_id: u64, quantity: u32) -> Result<StockOrder, AppError> {
        let mut inventory = self.inventory.write().await;

        let item = inventory
            .items
            .get_mut(&item_id)
            .ok_or_else(|| item_not_found(item_id))?;

        if quantity > item.quantity {
            tracing::warn!(
                item_id,
                requested = quantity,
                available = item.quantity,
                "Insufficient stock"
            );
            return Err(AppError::coded(
                StatusCode::BAD_REQUEST,
                "insufficient_stock",
                format!(
                    "Insufficient stock for item {item_id}. Requested: {quantity}, Available: {}",
                    item.quantity
                ),
                json!({
                    "item_id": item_id,
                    "requested": quantity,
                    "available": item.quantity,
                }),
            ));
        }

        item.quantity -= quantity;
        let (name, unit_price) = (item.name.clone(), item.price);

        inventory.last_order_id += 1;

        Ok(StockOrder {
            order_id: inventory.last_order_id,
            item: name,
            quantity,
            unit_price,
            total_price: unit_price * f64::from(quantity),
        })
    }

    /// # Errors
    ///
    /// Returns `INVALID_OPERATION` (422) while the item still has stock.
    pub async fn delete(&self, item_id: u64) -> Result<(), AppError> {
        let mut inventory = self.inventory.write().await;

        let item = inventory
            .items
            .get(&item_id)
            .ok_or_else(|| item_not_found(item_id))?;

        if item.quantity > 0 {
            return Err(AppError::business(
                "INVALID_OPERATION",
                format!(
                    "Cannot delete item with remaining stock: {} units",
                    item.quantity
                ),
                json!({ "item_id": item_id, "quantity": item.quantity }),
            ));
        }

        inventory.items.remove(&item_id);
        Ok(())
    }
}
