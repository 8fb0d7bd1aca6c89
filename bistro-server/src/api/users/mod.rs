//! User API 模块
//!
//! | 路径 | 方法 | 守卫 |
//! |------|------|------|
//! | /users | POST | 无 (登录时创建或刷新) |
//! | /users/admin/{email} | GET | 认证 + 路径邮箱归属 (handler 内) |
//! | /users | GET | 认证 + 管理员 |
//! | /users/admin/{id} | PATCH | 认证 + 管理员 |
//! | /users/{id} | DELETE | 认证 + 管理员 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::auth::{Guard, GuardedRouter};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let public_routes = Router::new().route("/users", post(handler::create));

    // GET and PATCH share one path template; the segment is an email for
    // GET and a record id for PATCH
    let member_routes = Router::new()
        .route("/users/admin/{key}", get(handler::check_admin))
        .guarded(state, &[Guard::Authenticated]);

    let admin_routes = Router::new()
        .route("/users", get(handler::list))
        .route("/users/admin/{key}", patch(handler::make_admin))
        .route("/users/{id}", delete(handler::delete))
        .guarded(state, &[Guard::Authenticated, Guard::Admin]);

    public_routes.merge(member_routes).merge(admin_routes)
}
