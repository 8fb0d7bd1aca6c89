//! Collection dump API
//!
//! `GET /m?c=<name>` 返回整张表。只允许枚举内的集合，每个集合自带守卫：
//!
//! | 集合 | 守卫 |
//! |------|------|
//! | menu, reviews | 无 |
//! | carts, users | 认证 + 管理员 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub use handler::Collection;

pub fn router() -> Router<ServerState> {
    Router::new().route("/m", get(handler::dump))
}
