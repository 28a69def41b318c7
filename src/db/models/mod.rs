//! Database Models

pub mod customer;
pub mod order;
pub mod product;

// Re-exports
pub use customer::{Customer, CustomerCreate, CustomerId};
pub use order::{Order, OrderId, OrderLine};
pub use product::{Product, ProductCreate, ProductId, QuantityUpdate};
