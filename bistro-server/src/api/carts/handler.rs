//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::ApiJson;
use crate::core::ServerState;
use crate::db::models::{CartItem, CartItemCreate};
use crate::db::repository::CartRepository;
use crate::utils::{AppError, AppResult};
use shared::models::{DeleteResult, InsertOneResult};

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: Option<String>,
}

/// GET /carts?email= - 当前用户的购物车
///
/// 归属已由守卫校验，这里的 email 一定等于令牌中的 email。
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CartQuery>,
) -> AppResult<Json<Vec<CartItem>>> {
    let email = query
        .email
        .ok_or_else(|| AppError::invalid_request("email is required"))?;
    let items = CartRepository::new(state.db.clone())
        .find_by_email(&email)
        .await?;
    Ok(Json(items))
}

/// POST /carts - 加入购物车
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CartItemCreate>,
) -> AppResult<Json<InsertOneResult>> {
    let id = CartRepository::new(state.db.clone()).create(payload).await?;
    Ok(Json(InsertOneResult::new(id.to_string())))
}

/// DELETE /carts/{id} - 移除购物车条目
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    let deleted = CartRepository::new(state.db.clone()).delete(&id).await?;
    Ok(Json(DeleteResult::single(deleted)))
}
