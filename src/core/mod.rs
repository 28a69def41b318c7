//! Core module - configuration and wired-up storefront state
//!
//! - [`Config`] - environment-driven configuration
//! - [`Storefront`] - repositories and checkout service bound to one database

pub mod config;
pub mod state;

pub use config::Config;
pub use state::Storefront;
