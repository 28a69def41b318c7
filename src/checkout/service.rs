//! Order-creation orchestrator

use super::error::{CheckoutError, CheckoutResult, classify_repo_error};
use super::request::CreateOrderRequest;
use super::{CustomerStore, OrderStore, ProductStore};
use crate::db::models::{Order, OrderLine};
use crate::db::repository::{RepoError, record_id};
use surrealdb::RecordId;

/// Sequences the order-creation flow over three injected stores
///
/// The service owns no locks and no database handle of its own; the atomic
/// part of the flow (stock decrement + order insert) is delegated to the
/// order store's transaction.
#[derive(Clone)]
pub struct CreateOrderService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> CreateOrderService<C, P, O>
where
    C: CustomerStore,
    P: ProductStore,
    O: OrderStore,
{
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Create an order for `customer_id` from the requested product lines
    ///
    /// Flow: validate request → resolve customer → resolve products →
    /// check stock against the looked-up (pre-decrement) quantities →
    /// snapshot prices → atomic reserve-and-persist. Any failure aborts the
    /// whole call; the store transaction guarantees stock is only ever
    /// decremented together with a persisted order.
    pub async fn execute(&self, request: CreateOrderRequest) -> CheckoutResult<Order> {
        request.validate()?;

        let customer = self
            .customers
            .find_by_id(&request.customer_id)
            .await?
            .ok_or_else(|| CheckoutError::CustomerNotFound(request.customer_id.clone()))?;
        let customer_id = customer
            .id
            .ok_or_else(|| RepoError::Database("customer record has no id".into()))?;

        let ids: Vec<RecordId> = request
            .products
            .iter()
            .map(|line| record_id("product", &line.product_id))
            .collect();

        let products = self.products.find_all_by_id(&ids).await?;
        if products.len() != ids.len() {
            tracing::warn!(
                customer_id = %customer_id,
                requested = ids.len(),
                found = products.len(),
                "Order rejected: unknown products"
            );
            return Err(CheckoutError::ProductNotFound);
        }

        // The store returns products in unspecified order; match each
        // requested line to its product by id, never by position.
        let mut lines = Vec::with_capacity(ids.len());
        for (rid, input) in ids.iter().zip(&request.products) {
            let product = products
                .iter()
                .find(|p| p.id.as_ref() == Some(rid))
                .ok_or(CheckoutError::ProductNotFound)?;

            if product.quantity < input.quantity {
                return Err(CheckoutError::InsufficientStock {
                    id: rid.to_string(),
                    name: product.name.clone(),
                });
            }

            // Price snapshot: the catalog price at validation time, never
            // anything caller-supplied.
            lines.push(OrderLine {
                product_id: rid.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: input.quantity,
            });
        }

        let order = self
            .orders
            .create(&customer_id, &lines)
            .await
            .map_err(|e| classify_repo_error(e, &lines))?;

        tracing::info!(
            order_id = ?order.id,
            customer_id = %customer_id,
            lines = order.lines.len(),
            "Order created"
        );
        Ok(order)
    }
}
