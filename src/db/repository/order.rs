//! Order Repository
//!
//! Owns the order-creation transaction: stock re-check, stock decrement and
//! order insert commit or cancel together. Orders are never updated after
//! creation.

use super::{BaseRepository, RepoError, RepoResult, is_commit_conflict, record_id, script_error};
use crate::checkout::OrderStore;
use crate::db::models::{Order, OrderLine};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

const ORDER_TABLE: &str = "orders";

/// Re-runs of the reservation script after an optimistic commit conflict.
/// One re-run usually settles it: the loser re-fetches the committed stock
/// and either fits into what is left or throws `insufficient_stock`.
const MAX_COMMIT_RETRIES: usize = 3;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = record_id(ORDER_TABLE, id);
        let order: Option<Order> = self
            .base
            .db()
            .select((ORDER_TABLE, rid.key().to_string()))
            .await?;
        Ok(order)
    }

    /// List all persisted orders
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at")
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Atomically reserve stock and persist the order
    ///
    /// One transaction script per call: each line re-fetches the current
    /// product row (the caller's validation snapshot may be stale by now),
    /// throws `product_missing:<line#>` if the row is gone or
    /// `insufficient_stock:<line#>` if the remaining quantity is short, then
    /// decrements the stock. The order row is only created after every line
    /// passed; any throw cancels the whole transaction, leaving stock and
    /// orders untouched.
    ///
    /// Two concurrent calls touching the same product row make the storage
    /// engine abort the losing transaction with a retryable conflict instead
    /// of running the script; that loser is re-run so it observes the
    /// winner's decrement and fails (or fits) on stock, not on plumbing.
    pub async fn create(&self, customer: &RecordId, lines: &[OrderLine]) -> RepoResult<Order> {
        if lines.is_empty() {
            return Err(RepoError::Validation(
                "order must contain at least one line".into(),
            ));
        }

        let mut script = String::from("BEGIN TRANSACTION;\n");
        for (i, _) in lines.iter().enumerate() {
            script.push_str(&format!(
                "LET $cur{i} = (SELECT * FROM $p{i})[0];\n\
                 IF $cur{i} == NONE {{ THROW 'product_missing:{i}' }};\n\
                 IF $cur{i}.quantity < $q{i} {{ THROW 'insufficient_stock:{i}' }};\n\
                 UPDATE $p{i} SET quantity -= $q{i};\n"
            ));
        }
        script.push_str("CREATE $oid CONTENT $order;\nCOMMIT TRANSACTION;");

        let order_id = RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
        let order = Order {
            id: None,
            customer: customer.clone(),
            lines: lines.to_vec(),
            created_at: Utc::now(),
        };

        let mut attempt = 0;
        loop {
            let mut query = self
                .base
                .db()
                .query(script.clone())
                .bind(("oid", order_id.clone()))
                .bind(("order", order.clone()));
            for (i, line) in lines.iter().enumerate() {
                query = query
                    .bind((format!("p{i}"), line.product_id.clone()))
                    .bind((format!("q{i}"), line.quantity));
            }

            let err = match query.await {
                Ok(mut result) => {
                    let errors = result.take_errors();
                    if errors.is_empty() {
                        return Ok(Order {
                            id: Some(order_id),
                            ..order
                        });
                    }
                    script_error(errors)
                }
                Err(e) => e.into(),
            };

            if attempt < MAX_COMMIT_RETRIES && is_commit_conflict(&err.to_string()) {
                attempt += 1;
                tracing::debug!(attempt, "Order transaction hit a commit conflict, re-running");
                continue;
            }
            return Err(err);
        }
    }
}

impl OrderStore for OrderRepository {
    async fn create(&self, customer: &RecordId, lines: &[OrderLine]) -> RepoResult<Order> {
        OrderRepository::create(self, customer, lines).await
    }
}
