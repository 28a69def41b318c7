//! Checkout - the order-creation core
//!
//! [`CreateOrderService`] sequences the whole order-creation flow: customer
//! lookup, product lookup, request validation, stock check and the atomic
//! reserve-and-persist commit. The stores it talks to are narrow traits,
//! injected at construction; the SurrealDB-backed implementations live in
//! [`crate::db::repository`].

pub mod error;
pub mod request;
pub mod service;


pub use error::{CheckoutError, CheckoutResult};
pub use request::{CreateOrderRequest, OrderLineInput};
pub use service::CreateOrderService;

use crate::db::models::{Customer, Order, OrderLine, Product};
use crate::db::repository::RepoResult;
use surrealdb::RecordId;

/// Read access to customers; absence is a distinct outcome, not an error
#[allow(async_fn_in_trait)]
pub trait CustomerStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>>;
}

/// Read access to catalog products
///
/// `find_all_by_id` returns only the products that exist, in unspecified
/// order; callers match results by id, never by position.
#[allow(async_fn_in_trait)]
pub trait ProductStore {
    async fn find_all_by_id(&self, ids: &[RecordId]) -> RepoResult<Vec<Product>>;
}

/// Transactional order persistence
///
/// `create` must re-check stock against the current product rows, decrement
/// it and insert the order as one atomic unit: either both writes happen or
/// neither does. Per-line failures are reported with the
/// `product_missing:<line#>` / `insufficient_stock:<line#>` tags so the
/// checkout layer can map them back to typed errors.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    async fn create(&self, customer: &RecordId, lines: &[OrderLine]) -> RepoResult<Order>;
}
