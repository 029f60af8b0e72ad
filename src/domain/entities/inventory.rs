//! Inventory item for the exception-handling lesson.

use serde::Serialize;

/// Categories an inventory item may belong to.
pub const CATEGORIES: &[&str] = &["electronics", "books", "clothing", "food"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: String,
}

/// Receipt returned after stock has been taken from an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockOrder {
    pub order_id: u64,
    pub item: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}
