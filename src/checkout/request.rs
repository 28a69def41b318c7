//! Order-creation request types

use super::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller-supplied order request, unvalidated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub products: Vec<OrderLineInput>,
}

/// One requested product line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product_id: String,
    pub quantity: i64,
}

impl CreateOrderRequest {
    /// Reject malformed requests before touching any store
    ///
    /// An empty line list, a blank or duplicate product id, or a
    /// non-positive quantity each abort the call. Duplicates are rejected
    /// rather than merged; merging would silently change what the caller
    /// asked for.
    pub(super) fn validate(&self) -> Result<(), CheckoutError> {
        if self.products.is_empty() {
            return Err(CheckoutError::InvalidRequest(
                "order must contain at least one product line".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.products.len());
        for line in &self.products {
            if line.product_id.trim().is_empty() {
                return Err(CheckoutError::InvalidRequest(
                    "product id must not be empty".into(),
                ));
            }
            if line.quantity <= 0 {
                return Err(CheckoutError::InvalidRequest(format!(
                    "quantity for product {} must be positive",
                    line.product_id
                )));
            }
            if !seen.insert(line.product_id.as_str()) {
                return Err(CheckoutError::InvalidRequest(format!(
                    "duplicate product line: {}",
                    line.product_id
                )));
            }
        }

        Ok(())
    }
}
