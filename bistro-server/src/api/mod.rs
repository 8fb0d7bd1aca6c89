//! HTTP API 路由
//!
//! 每个资源一个子模块，各自导出 `router()`，由 [`build_app`](crate::core::build_app) 合并。

mod extract;

pub mod auth;
pub mod carts;
pub mod collections;
pub mod health;
pub mod menu;
pub mod reviews;
pub mod users;

pub use extract::ApiJson;
