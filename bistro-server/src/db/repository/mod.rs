//! Repository Module
//!
//! One repository per table; each method is a single SurrealDB round-trip.

pub mod cart;
pub mod menu;
pub mod review;
pub mod user;

// Re-exports
pub use cart::CartRepository;
pub use menu::MenuRepository;
pub use review::ReviewRepository;
pub use user::{SignIn, UserRepository};

use surrealdb::engine::any::Any;
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

    /// Optimistic transaction lost to a concurrent writer; safe to retry
    #[error("Transaction conflict: {0}")]
    Conflict(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if matches!(err, surrealdb::Error::Db(surrealdb::error::Db::TxRetryable)) {
            return RepoError::Conflict(message);
        }
        // Unique index violation: "Database index `users_email_unique` already contains ..."
        if message.contains("already contains") {
            RepoError::Duplicate(message)
        } else if message.contains("read or write conflict") {
            // Failed commits arrive wrapped in `QueryNotExecutedDetail`
            RepoError::Conflict(message)
        } else {
            RepoError::Database(message)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 对外统一使用 "table:key" 格式
// =============================================================================
//
// 路径参数既可以是 "carts:abc" 也可以是裸 key "abc"。
// 指向其它表的 id 视为不存在，不会被用来操作别的表。

/// Resolve a path id into a record of `table`
pub fn record_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RepoError::Validation("Empty ID".to_string()));
    }

    if raw.contains(':') {
        let id: RecordId = raw
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", raw)))?;
        if id.table() != table {
            return Err(RepoError::NotFound(format!("{} is not a {} record", raw, table)));
        }
        Ok(id)
    } else {
        Ok(RecordId::from_table_key(table, raw))
    }
}

/// Row projection for documents: every stored field, with the record id
/// rendered as a `"table:key"` string under `_id`
pub const DOCUMENT_PROJECTION: &str = "*, <string> id AS _id OMIT id";

/// Just the id of a returned row
#[derive(Debug, serde::Deserialize)]
pub(crate) struct RecordRef {
    pub id: RecordId,
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Any>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }

    /// Full table dump, used by the read-only collections
    pub async fn select_all<T>(&self, table: &'static str) -> RepoResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let rows: Vec<T> = self
            .db
            .query(format!(
                "SELECT {DOCUMENT_PROJECTION} FROM type::table($table)"
            ))
            .bind(("table", table))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Delete one record, returning whether it existed
    pub async fn delete_record(&self, id: RecordId) -> RepoResult<bool> {
        let deleted: Vec<RecordRef> = self
            .db
            .query("DELETE $thing RETURN BEFORE")
            .bind(("thing", id))
            .await?
            .take(0)?;
        Ok(!deleted.is_empty())
    }
}
