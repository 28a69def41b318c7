//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) connection and schema definition.

pub mod models;
pub mod repository;

use repository::RepoResult;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "storefront";
const DATABASE: &str = "main";

/// Open the embedded database at `data_dir` and define the schema
pub async fn connect(data_dir: &Path) -> RepoResult<Surreal<Db>> {
    let db: Surreal<Db> = Surreal::new::<RocksDb>(data_dir).await?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;

    define_schema(&db).await?;

    tracing::info!(path = %data_dir.display(), "Database connection established");
    Ok(db)
}

/// Define tables and unique indexes (idempotent)
async fn define_schema(db: &Surreal<Db>) -> RepoResult<()> {
    db.query(
        "DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS uniq_customer_email ON customer FIELDS email UNIQUE;
         DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS uniq_product_name ON product FIELDS name UNIQUE;
         DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;",
    )
    .await?
    .check()?;
    Ok(())
}
