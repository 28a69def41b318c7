//! Repository Module
//!
//! CRUD and transactional operations over the embedded SurrealDB tables.

pub mod customer;
pub mod order;
pub mod product;

// Re-exports
pub use customer::CustomerRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use std::collections::HashMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: ids are accepted as "table:key" or bare "key"
// =============================================================================

/// Parse an id into a [`RecordId`], defaulting to `table` when no table
/// prefix is present.
pub fn record_id(table: &str, id: &str) -> RecordId {
    id.parse::<RecordId>()
        .unwrap_or_else(|_| RecordId::from_table_key(table, id))
}

/// Tags thrown by transaction scripts to report a per-line business failure.
/// The line index follows the tag, e.g. `insufficient_stock:2`.
pub const TAG_INSUFFICIENT_STOCK: &str = "insufficient_stock:";
pub const TAG_PRODUCT_MISSING: &str = "product_missing:";

/// True when the message reports SurrealDB's optimistic-concurrency abort
/// ("read or write conflict"). Such a transaction never touched the data and
/// is safe to re-run; on the re-run the per-line re-fetch sees whatever the
/// winning transaction committed.
pub(crate) fn is_commit_conflict(message: &str) -> bool {
    message.contains("read or write conflict")
}

/// Reduce the statement errors of a cancelled transaction to one [`RepoError`].
///
/// A `THROW` cancels the whole transaction and every statement slot reports
/// an error; only one of them carries the thrown tag, so prefer that one over
/// the generic cancellation notices.
pub(crate) fn script_error(errors: HashMap<usize, surrealdb::Error>) -> RepoError {
    let mut messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
    if let Some(tagged) = messages
        .iter()
        .find(|m| m.contains(TAG_INSUFFICIENT_STOCK) || m.contains(TAG_PRODUCT_MISSING))
    {
        return RepoError::Database(tagged.clone());
    }
    RepoError::Database(
        messages
            .pop()
            .unwrap_or_else(|| "Transaction failed".to_string()),
    )
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_bare_and_prefixed_keys() {
        let bare = record_id("product", "p1");
        assert_eq!(bare.to_string(), "product:p1");

        let prefixed = record_id("product", "product:p1");
        assert_eq!(prefixed, bare);
    }

    #[test]
    fn script_error_prefers_thrown_tag_over_cancellation_notice() {
        let mut errors = HashMap::new();
        errors.insert(
            0,
            surrealdb::Error::Api(surrealdb::error::Api::Query(
                "The query was not executed due to a cancelled transaction".into(),
            )),
        );
        errors.insert(
            2,
            surrealdb::Error::Api(surrealdb::error::Api::Query(
                "An error occurred: insufficient_stock:1".into(),
            )),
        );

        let err = script_error(errors);
        assert!(err.to_string().contains("insufficient_stock:1"));
    }

    #[test]
    fn commit_conflicts_are_recognized_and_tags_are_not() {
        assert!(is_commit_conflict(
            "The query was not executed due to a failed transaction. \
             Failed to commit transaction due to a read or write conflict. \
             This transaction can be retried"
        ));
        assert!(!is_commit_conflict("An error occurred: insufficient_stock:0"));
        assert!(!is_commit_conflict("An error occurred: product_missing:2"));
    }
}
