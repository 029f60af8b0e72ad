//! Models for the request-validation lesson.
//!
//! Every constraint is declared with `validator` attributes; the handlers
//! only echo what passed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::utils::patterns::{
    CREDIT_CARD, DISCOUNT_CODE, HEX_COLOR, IPV4, LETTERS_ONLY, ORDER_ID, PHONE, SEARCH_TERM, SKU,
    URL_SLUG, USERNAME,
};

/// Case-insensitive words a review comment may not contain.
pub const SPAM_WORDS: &[&str] = &["spam", "viagra", "casino", "winner"];

/// Maximum number of repeated `tags` values on the filter endpoint.
pub const MAX_TAGS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserModel {
    #[validate(length(min = 3, max = 20), regex(path = *USERNAME))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(range(min = 18, max = 120))]
    pub age: u32,

    #[validate(regex(path = *PHONE, message = "Phone number must be in E.164 format"))]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductModel {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, max = 1_000_000.0))]
    pub price: f64,

    pub quantity: u32,

    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,

    #[validate(regex(path = *SKU, message = "SKU format: 3 uppercase letters, dash, 4 digits"))]
    pub sku: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewModel {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,

    #[validate(length(min = 10, max = 1000), custom(function = "reject_spam"))]
    pub comment: String,

    #[validate(length(min = 2, max = 50))]
    pub reviewer_name: String,
}

fn reject_spam(comment: &str) -> Result<(), ValidationError> {
    let lowered = comment.to_lowercase();
    if SPAM_WORDS.iter().any(|word| lowered.contains(word)) {
        return Err(ValidationError::new("spam").with_message("Comment contains spam words".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Price,
    Date,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 50), regex(path = *SEARCH_TERM))]
    pub q: String,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1000))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,

    pub sort_by: Option<SortField>,

    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,

    #[validate(range(max = 1_000_000.0))]
    pub max_price: Option<f64>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Filter parameters. `tags` may repeat, so the query string is decoded
/// by hand instead of through `Query`.
#[derive(Debug, Serialize, Validate)]
pub struct FilterParams {
    #[validate(length(min = 2, max = 30), regex(path = *LETTERS_ONLY))]
    pub category: String,

    pub in_stock: bool,

    #[validate(length(max = 20))]
    pub tags: Vec<String>,
}

impl FilterParams {
    /// Decodes `category`, `in_stock` and repeated `tags` from a raw query string.
    pub fn from_query(raw: &str) -> Result<Self, ValidationError> {
        let mut category = None;
        let mut in_stock = true;
        let mut tags = Vec::new();

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "category" => category = Some(value.into_owned()),
                "in_stock" => {
                    in_stock = parse_bool(&value).ok_or_else(|| {
                        ValidationError::new("in_stock")
                            .with_message("in_stock must be a boolean".into())
                    })?;
                }
                "tags" => tags.push(value.into_owned()),
                _ => {}
            }
        }

        let category = category.ok_or_else(|| {
            ValidationError::new("required").with_message("category is required".into())
        })?;

        Ok(Self {
            category,
            in_stock,
            tags,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserIdPath {
    #[validate(range(min = 1, max = 999_999))]
    pub user_id: u32,
}

/// Shares the `{product_id}` route segment with the review endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct SkuPath {
    #[serde(rename = "product_id")]
    #[validate(regex(path = *SKU, message = "SKU format: 3 uppercase letters, dash, 4 digits"))]
    pub sku: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderPath {
    #[validate(range(min = 2020, max = 2030))]
    pub year: u32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(regex(path = *ORDER_ID, message = "Order ID format: ORD-XXXXXXXX"))]
    pub order_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PositiveIdPath {
    #[serde(alias = "user_id", alias = "product_id")]
    #[validate(range(min = 1))]
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailQuery {
    #[serde(default)]
    pub send_email: bool,
}

#[derive(Debug, Deserialize)]
pub struct VerifiedPurchaseQuery {
    #[serde(default)]
    pub verified_purchase: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ComplexItemRequest {
    #[validate(nested)]
    pub product: ProductModel,

    #[validate(nested)]
    pub user: UserModel,

    #[validate(range(min = 1, max = 1000))]
    pub quantity: u32,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(range(min = 1))]
    pub product_id: u64,

    #[validate(range(min = 1, max = 100))]
    pub quantity: u32,

    pub priority: Priority,

    #[validate(regex(
        path = *DISCOUNT_CODE,
        message = "Discount code must be 6-10 uppercase letters or digits"
    ))]
    pub discount_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegexExamplesQuery {
    #[validate(regex(path = *IPV4))]
    pub ip_address: Option<String>,

    #[validate(regex(path = *HEX_COLOR))]
    pub hex_color: Option<String>,

    #[validate(regex(path = *URL_SLUG))]
    pub url_slug: Option<String>,

    #[validate(regex(path = *CREDIT_CARD))]
    pub credit_card: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NestedValidationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, max = 1_000_000.0))]
    pub price: f64,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}
