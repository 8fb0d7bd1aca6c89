//! Menu API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::db::repository::MenuRepository;
use crate::utils::AppResult;

/// GET /menu - 获取全部菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = MenuRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(items))
}
