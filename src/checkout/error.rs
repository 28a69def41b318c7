//! Checkout error taxonomy
//!
//! Every failure aborts the whole order-creation call before (or together
//! with) any persistence; nothing is retried here, and nothing is fatal to
//! the process.

use crate::db::models::OrderLine;
use crate::db::repository::{RepoError, TAG_INSUFFICIENT_STOCK, TAG_PRODUCT_MISSING};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("One or more requested products do not exist")]
    ProductNotFound,

    #[error("Insufficient stock for product \"{name}\" ({id})")]
    InsufficientStock { id: String, name: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Map a tagged store error back to the checkout taxonomy
///
/// The order store reports post-refetch failures by throwing
/// `insufficient_stock:<line#>` / `product_missing:<line#>` inside its
/// transaction; `lines` is the request the tags index into. Anything without
/// a tag is an infrastructure failure and passes through unchanged.
pub(super) fn classify_repo_error(err: RepoError, lines: &[OrderLine]) -> CheckoutError {
    let message = err.to_string();

    if let Some(index) = tagged_index(&message, TAG_INSUFFICIENT_STOCK)
        && let Some(line) = lines.get(index)
    {
        return CheckoutError::InsufficientStock {
            id: line.product_id.to_string(),
            name: line.name.clone(),
        };
    }
    if tagged_index(&message, TAG_PRODUCT_MISSING).is_some() {
        return CheckoutError::ProductNotFound;
    }

    CheckoutError::Repo(err)
}

/// Extract the line index following `tag` in an error message
fn tagged_index(message: &str, tag: &str) -> Option<usize> {
    let start = message.find(tag)? + tag.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use surrealdb::RecordId;

    fn line(key: &str) -> OrderLine {
        OrderLine {
            product_id: RecordId::from_table_key("product", key),
            name: format!("{key} name"),
            price: Decimal::new(500, 2),
            quantity: 1,
        }
    }

    #[test]
    fn classifies_insufficient_stock_by_line_index() {
        let lines = vec![line("p1"), line("p2")];
        let err = RepoError::Database("An error occurred: insufficient_stock:1".into());

        match classify_repo_error(err, &lines) {
            CheckoutError::InsufficientStock { id, name } => {
                assert_eq!(id, "product:p2");
                assert_eq!(name, "p2 name");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_product_missing() {
        let lines = vec![line("p1")];
        let err = RepoError::Database("An error occurred: product_missing:0".into());
        assert!(matches!(
            classify_repo_error(err, &lines),
            CheckoutError::ProductNotFound
        ));
    }

    #[test]
    fn untagged_errors_pass_through() {
        let lines = vec![line("p1")];
        let err = RepoError::Database("disk failure".into());
        assert!(matches!(
            classify_repo_error(err, &lines),
            CheckoutError::Repo(_)
        ));
    }

    #[test]
    fn tagged_index_ignores_trailing_text() {
        assert_eq!(tagged_index("x insufficient_stock:12 y", "insufficient_stock:"), Some(12));
        assert_eq!(tagged_index("no tag here", "insufficient_stock:"), None);
    }
}
