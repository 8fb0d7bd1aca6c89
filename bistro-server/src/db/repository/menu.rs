//! Menu Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::MenuItem;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const TABLE: &str = "menu";

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        self.base.select_all(TABLE).await
    }
}
