//! Orders and order lines for the e-commerce lesson.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Cancelled orders are frozen; delivered orders can only stay delivered.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            Self::Cancelled => false,
            Self::Delivered => next == Self::Delivered,
            _ => true,
        }
    }

    /// Orders that left the warehouse cannot be cancelled.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, Self::Shipped | Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderLine>>,
}

/// A purchased product with the price captured at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_purchase: f64,
    pub subtotal: f64,
}

/// A requested product and quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<OrderStatus>,
}
