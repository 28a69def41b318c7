//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, is_commit_conflict, record_id, script_error};
use crate::checkout::ProductStore;
use crate::db::models::{Product, ProductCreate, QuantityUpdate};
use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = record_id(PRODUCT_TABLE, id);
        let product: Option<Product> = self
            .base
            .db()
            .select((PRODUCT_TABLE, rid.key().to_string()))
            .await?;
        Ok(product)
    }

    /// Find product by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE name = $name")
            .bind(("name", name.to_string()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Find the products that exist among `ids`
    ///
    /// Missing ids are simply absent from the result; the caller compares
    /// cardinality against the request. Result order is unspecified.
    pub async fn find_all_by_id(&self, ids: &[RecordId]) -> RepoResult<Vec<Product>> {
        let ids = ids.to_vec();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id IN $ids")
            .bind(("ids", ids))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products)
    }

    /// Create a new product; the name must be unique in the catalog
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name cannot be empty".into()));
        }
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }
        if data.quantity < 0 {
            return Err(RepoError::Validation("quantity cannot be negative".into()));
        }
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product {} already exists",
                data.name
            )));
        }

        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            quantity: data.quantity,
            created_at: Utc::now(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Write new absolute quantities for a batch of products in one transaction
    ///
    /// Every referenced product must exist; a missing id cancels the whole
    /// batch instead of being silently skipped. Returns the updated records.
    pub async fn update_quantity(&self, updates: Vec<QuantityUpdate>) -> RepoResult<Vec<Product>> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let mut script = String::from("BEGIN TRANSACTION;\n");
        for (i, update) in updates.iter().enumerate() {
            if update.quantity < 0 {
                return Err(RepoError::Validation(format!(
                    "quantity for product {} cannot be negative",
                    update.product_id
                )));
            }
            script.push_str(&format!(
                "LET $cur{i} = (SELECT * FROM $p{i})[0];\n\
                 IF $cur{i} == NONE {{ THROW 'product_missing:{i}' }};\n\
                 UPDATE $p{i} SET quantity = $q{i};\n"
            ));
        }
        script.push_str("COMMIT TRANSACTION;");

        let ids: Vec<RecordId> = updates
            .iter()
            .map(|u| record_id(PRODUCT_TABLE, &u.product_id))
            .collect();

        // Losing a commit conflict against a concurrent writer leaves the
        // data untouched; re-run the script instead of surfacing the abort.
        let mut attempt = 0;
        loop {
            let mut query = self.base.db().query(script.clone());
            for (i, (rid, update)) in ids.iter().zip(&updates).enumerate() {
                query = query
                    .bind((format!("p{i}"), rid.clone()))
                    .bind((format!("q{i}"), update.quantity));
            }

            let err = match query.await {
                Ok(mut result) => {
                    let errors = result.take_errors();
                    if errors.is_empty() {
                        break;
                    }
                    script_error(errors)
                }
                Err(e) => e.into(),
            };

            if attempt < 3 && is_commit_conflict(&err.to_string()) {
                attempt += 1;
                continue;
            }
            return Err(err);
        }

        tracing::info!(count = ids.len(), "Product quantities updated");
        self.find_all_by_id(&ids).await
    }
}

impl ProductStore for ProductRepository {
    async fn find_all_by_id(&self, ids: &[RecordId]) -> RepoResult<Vec<Product>> {
        ProductRepository::find_all_by_id(self, ids).await
    }
}
