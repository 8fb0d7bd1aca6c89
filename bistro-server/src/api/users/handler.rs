//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::ApiJson;
use crate::auth::{CurrentUser, ensure_owner};
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::db::repository::{SignIn, UserRepository};
use crate::utils::AppResult;
use shared::models::{AdminStatus, CreateUserResponse, DeleteResult, InsertOneResult, UpdateResult};

/// GET /users/admin/{email} - 查询自己是否为管理员
pub async fn check_admin(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(email): Path<String>,
) -> AppResult<Json<AdminStatus>> {
    ensure_owner(&current_user, Some(&email))?;

    let user = UserRepository::new(state.db.clone())
        .find_by_email(&email)
        .await?;
    Ok(Json(AdminStatus {
        admin: user.is_some_and(|u| u.is_admin()),
    }))
}

/// GET /users - 获取所有用户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = UserRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(users))
}

/// POST /users - 登录时创建用户，已存在则只刷新更新时间
///
/// 并发的首次登录由 email 唯一索引兜底，冲突的事务在仓库层重试，
/// 输掉插入竞争的一方按“已存在”处理。
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<UserCreate>,
) -> AppResult<Json<CreateUserResponse>> {
    let email = payload.email.clone();

    let response = match UserRepository::new(state.db.clone()).sign_in(payload).await? {
        SignIn::Created(id) => {
            tracing::info!(email = %email, id = %id, "User created");
            CreateUserResponse::Inserted(InsertOneResult::new(id.to_string()))
        }
        SignIn::Existing { matched } => {
            CreateUserResponse::already_exists(UpdateResult::single(matched))
        }
    };
    Ok(Json(response))
}

/// PATCH /users/admin/{id} - 提升为管理员
pub async fn make_admin(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UpdateResult>> {
    let matched = UserRepository::new(state.db.clone())
        .promote_to_admin(&id)
        .await?;

    if matched {
        tracing::info!(target_id = %id, by = %current_user.email, "User promoted to admin");
    }
    Ok(Json(UpdateResult::single(matched)))
}

/// DELETE /users/{id} - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    let deleted = UserRepository::new(state.db.clone()).delete(&id).await?;

    if deleted {
        tracing::info!(target_id = %id, by = %current_user.email, "User deleted");
    }
    Ok(Json(DeleteResult::single(deleted)))
}
