//! Menu API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// 公共只读路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/menu", get(handler::list))
}
