//! Collection dump handler

use std::fmt;
use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::auth::{Guard, Pipeline};
use crate::core::ServerState;
use crate::db::repository::{CartRepository, MenuRepository, ReviewRepository, UserRepository};
use crate::utils::{AppError, AppResult};

const ADMIN_ONLY: &[Guard] = &[Guard::Authenticated, Guard::Admin];

/// 可导出的集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Menu,
    Reviews,
    Carts,
    Users,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Menu => "menu",
            Collection::Reviews => "reviews",
            Collection::Carts => "carts",
            Collection::Users => "users",
        }
    }

    /// Guards a request must pass before the dump runs
    pub fn guards(&self) -> &'static [Guard] {
        match self {
            Collection::Menu | Collection::Reviews => &[],
            Collection::Carts | Collection::Users => ADMIN_ONLY,
        }
    }
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(Collection::Menu),
            "reviews" => Ok(Collection::Reviews),
            "carts" => Ok(Collection::Carts),
            "users" => Ok(Collection::Users),
            other => Err(AppError::invalid_request(format!(
                "unknown collection: {other}"
            ))),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
struct CollectionQuery {
    c: Option<String>,
}

/// GET /m?c=<name> - 导出整张表
///
/// 守卫依赖集合名，所以在 handler 里按集合运行管线。
pub async fn dump(State(state): State<ServerState>, mut parts: Parts) -> AppResult<Response> {
    let Query(query) = Query::<CollectionQuery>::try_from_uri(&parts.uri)
        .unwrap_or_else(|_| Query(CollectionQuery::default()));

    let collection: Collection = query
        .c
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::invalid_request("missing collection name"))?
        .parse()?;

    Pipeline(collection.guards()).run(&state, &mut parts).await?;

    let db = state.db.clone();
    let response = match collection {
        Collection::Menu => Json(MenuRepository::new(db).find_all().await?).into_response(),
        Collection::Reviews => Json(ReviewRepository::new(db).find_all().await?).into_response(),
        Collection::Carts => Json(CartRepository::new(db).find_all().await?).into_response(),
        Collection::Users => Json(UserRepository::new(db).find_all().await?).into_response(),
    };

    tracing::debug!(collection = %collection, "Collection dumped");
    Ok(response)
}
