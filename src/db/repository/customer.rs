//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::checkout::CustomerStore;
use crate::db::models::{Customer, CustomerCreate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CUSTOMER_TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find customer by id; absence is reported as `Ok(None)`
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let rid = record_id(CUSTOMER_TABLE, id);
        let customer: Option<Customer> = self
            .base
            .db()
            .select((CUSTOMER_TABLE, rid.key().to_string()))
            .await?;
        Ok(customer)
    }

    /// Find customer by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Create a new customer; the email must not already be registered
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name cannot be empty".into()));
        }
        if data.email.trim().is_empty() || !data.email.contains('@') {
            return Err(RepoError::Validation(format!(
                "invalid email: {}",
                data.email
            )));
        }
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Customer email {} already registered",
                data.email
            )));
        }

        let customer = Customer {
            id: None,
            name: data.name,
            email: data.email,
            created_at: Utc::now(),
        };

        let created: Option<Customer> = self
            .base
            .db()
            .create(CUSTOMER_TABLE)
            .content(customer)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }
}

impl CustomerStore for CustomerRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        CustomerRepository::find_by_id(self, id).await
    }
}
