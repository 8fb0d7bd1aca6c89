//! Cart API 模块
//!
//! 读取需要认证且 `?email=` 必须是本人；写入保持公开。

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::auth::{Guard, GuardedRouter};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/carts", get(handler::list))
        .guarded(state, &[Guard::Authenticated, Guard::QueryEmailOwner]);

    let write_routes = Router::new()
        .route("/carts", post(handler::create))
        .route("/carts/{id}", delete(handler::delete));

    read_routes.merge(write_routes)
}
