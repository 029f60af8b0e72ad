//! DTOs for the exception-handling lesson.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::inventory::CATEGORIES;
use crate::domain::entities::{InventoryItem, NewInventoryItem};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,

    pub quantity: u32,

    #[validate(custom(function = "known_category"))]
    pub category: String,
}

fn known_category(category: &str) -> Result<(), ValidationError> {
    if CATEGORIES.iter().any(|c| c.eq_ignore_ascii_case(category)) {
        return Ok(());
    }
    Err(ValidationError::new("category").with_message(
        format!("Category must be one of: {}", CATEGORIES.join(", ")).into(),
    ))
}

impl From<CreateItemRequest> for NewInventoryItem {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            quantity: req.quantity,
            category: req.category,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct StockOrderRequest {
    pub item_id: u64,

    #[validate(range(min = 1))]
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<InventoryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_is_case_insensitive() {
        assert!(known_category("Electronics").is_ok());
        assert!(known_category("toys").is_err());
    }
}
