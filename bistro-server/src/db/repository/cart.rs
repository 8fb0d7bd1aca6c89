//! Cart Repository

use super::{BaseRepository, DOCUMENT_PROJECTION, RecordRef, RepoError, RepoResult, record_id};
use crate::db::models::{CartItem, CartItemCreate};
use surrealdb::engine::any::Any;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "carts";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Every cart item of every user
    pub async fn find_all(&self) -> RepoResult<Vec<CartItem>> {
        self.base.select_all(TABLE).await
    }

    /// Cart items owned by `email`
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query(format!(
                "SELECT {DOCUMENT_PROJECTION} FROM carts WHERE email = $email"
            ))
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Add an item to a cart
    pub async fn create(&self, data: CartItemCreate) -> RepoResult<RecordId> {
        let mut result = self
            .base
            .db()
            .query("CREATE carts CONTENT $data RETURN id")
            .bind(("data", data))
            .await?;
        let created: Vec<RecordRef> = result.take(0)?;
        created
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| RepoError::Database("Failed to create cart item".to_string()))
    }

    /// Remove a cart item by id
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = record_id(TABLE, id)?;
        self.base.delete_record(thing).await
    }
}
