//! Core Module - 服务器核心
//!
//! - [`Config`] 环境变量配置
//! - [`ServerState`] 共享状态
//! - [`Server`] / [`build_app`] HTTP 服务器和路由组装

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, DbConfig, LogConfig};
pub use server::{Server, build_app};
pub use state::ServerState;
