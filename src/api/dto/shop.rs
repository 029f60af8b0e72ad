//! DTOs for the e-commerce lesson.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{
    NewOrder, NewProduct, OrderFilter, OrderItemRequest, OrderStatus, ProductFilter, ProductPatch,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,

    #[validate(range(min = 0))]
    pub stock: i64,

    #[validate(length(max = 50))]
    pub category: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            category: req.category,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,

    #[validate(range(min = 0))]
    pub stock: Option<i64>,

    #[validate(length(max = 50))]
    pub category: Option<String>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            category: req.category,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListProductsQuery {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,

    pub category: Option<String>,

    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,

    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,

    #[serde(default)]
    pub in_stock: bool,
}

fn default_limit() -> i64 {
    100
}

impl From<ListProductsQuery> for ProductFilter {
    fn from(q: ListProductsQuery) -> Self {
        Self {
            skip: q.skip,
            limit: q.limit,
            category: q.category,
            min_price: q.min_price,
            max_price: q.max_price,
            in_stock: q.in_stock,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderItemPayload {
    #[validate(range(min = 1))]
    pub product_id: i64,

    #[validate(range(min = 1))]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,

    #[validate(email)]
    pub customer_email: String,

    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemPayload>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            items: req
                .items
                .into_iter()
                .map(|item| OrderItemRequest {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListOrdersQuery {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,

    pub status: Option<OrderStatus>,
}

impl From<ListOrdersQuery> for OrderFilter {
    fn from(q: ListOrdersQuery) -> Self {
        Self {
            skip: q.skip,
            limit: q.limit,
            status: q.status,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}
