//! Storefront - order creation core
//!
//! Creates customer orders against a catalog of priced, quantity-tracked
//! products. The single exposed operation is [`Storefront::create_order`]:
//! it verifies the customer, verifies every requested product, checks stock,
//! then decrements stock and persists the order in one atomic transaction,
//! snapshotting each line's price and quantity at purchase time.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Configuration and wired-up state
//! ├── db/            # Embedded SurrealDB: models, repositories, schema
//! ├── checkout/      # Store traits, request validation, orchestrator
//! └── utils/         # Logging setup
//! ```
//!
//! Transports (HTTP, RPC, CLI) live outside this crate; they map
//! [`CheckoutError`] variants onto their own status codes.

pub mod checkout;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use checkout::{
    CheckoutError, CheckoutResult, CreateOrderRequest, CreateOrderService, CustomerStore,
    OrderLineInput, OrderStore, ProductStore,
};
pub use core::{Config, Storefront};
pub use db::models::{
    Customer, CustomerCreate, Order, OrderLine, Product, ProductCreate, QuantityUpdate,
};
pub use db::repository::{
    CustomerRepository, OrderRepository, ProductRepository, RepoError, RepoResult,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
