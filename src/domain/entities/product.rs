//! Catalogue product for the e-commerce lesson.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub skip: i64,
    pub limit: i64,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// `true` keeps only products with stock left.
    pub in_stock: bool,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            category: None,
            min_price: None,
            max_price: None,
            in_stock: false,
        }
    }
}
