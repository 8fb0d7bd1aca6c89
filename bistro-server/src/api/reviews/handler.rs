//! Review API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::Review;
use crate::db::repository::ReviewRepository;
use crate::utils::AppResult;

/// GET /reviews - 获取全部评价
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Review>>> {
    let reviews = ReviewRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(reviews))
}
