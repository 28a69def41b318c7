//! Order Model
//!
//! Orders are written once by the checkout transaction and never mutated.
//! Each line freezes the product's price and the purchased quantity at
//! creation time, so later catalog changes do not affect existing orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// One priced, quantified line of a persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Record link to the catalog product
    pub product_id: RecordId,
    /// Product name at order time (for receipts)
    pub name: String,
    /// Price snapshot at order time, never caller-supplied
    pub price: Decimal,
    pub quantity: i64,
}

/// Persisted order aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    /// Record link to the customer
    pub customer: RecordId,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}
