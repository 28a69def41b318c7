//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Catalog product
///
/// `quantity` is the tracked stock level; only the order-creation
/// transaction decrements it, and it never goes below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

/// Absolute quantity write for one product, used in batch stock updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub product_id: String,
    pub quantity: i64,
}
