//! Storefront state - repositories and checkout service bound to one database

use crate::checkout::{CheckoutResult, CreateOrderRequest, CreateOrderService};
use crate::core::Config;
use crate::db;
use crate::db::models::Order;
use crate::db::repository::{CustomerRepository, OrderRepository, ProductRepository, RepoResult};
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// All repositories wired to a single embedded database, plus the
/// order-creation service built on top of them.
///
/// The checkout service receives the store handles explicitly at
/// construction; there is no ambient database state anywhere in the crate.
#[derive(Clone)]
pub struct Storefront {
    pub customers: CustomerRepository,
    pub products: ProductRepository,
    pub orders: OrderRepository,
    checkout: CreateOrderService<CustomerRepository, ProductRepository, OrderRepository>,
}

impl Storefront {
    /// Open the database under `config.data_dir` and wire all repositories
    pub async fn open(config: &Config) -> RepoResult<Self> {
        let db = db::connect(Path::new(&config.data_dir)).await?;
        Ok(Self::with_db(db))
    }

    /// Wire repositories onto an already-connected database handle
    pub fn with_db(db: Surreal<Db>) -> Self {
        let customers = CustomerRepository::new(db.clone());
        let products = ProductRepository::new(db.clone());
        let orders = OrderRepository::new(db);
        let checkout =
            CreateOrderService::new(customers.clone(), products.clone(), orders.clone());
        Self {
            customers,
            products,
            orders,
            checkout,
        }
    }

    /// Create an order: the single operation exposed to transport layers
    pub async fn create_order(&self, request: CreateOrderRequest) -> CheckoutResult<Order> {
        self.checkout.execute(request).await
    }
}
