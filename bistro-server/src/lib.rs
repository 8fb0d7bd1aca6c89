//! Bistro Server - 餐厅点餐站点后端
//!
//! # 架构概述
//!
//! REST backend for the bistro ordering site: users, menu, reviews and
//! shopping carts stored in SurrealDB, guarded by JWT authentication.
//!
//! - **数据库** (`db`): SurrealDB connection + repositories
//! - **认证** (`auth`): JWT issuing/verification, ownership and role guards
//! - **HTTP API** (`api`): one router per resource
//!
//! # 模块结构
//!
//! ```text
//! bistro-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT、守卫管线
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 日志初始化、错误转换
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, Guard, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 加载 `.env` 并初始化日志
///
/// `.env` 缺失不是错误，生产环境直接使用进程环境变量。
pub fn setup_environment() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    let log = core::config::LogConfig::from_env();
    init_logger_with_file(&log.level, log.json, log.dir.as_deref())?;
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _      __
   / __ )(_)____/ /__________
  / __  / / ___/ __/ ___/ __ \
 / /_/ / (__  ) /_/ /  / /_/ /
/_____/_/____/\__/_/   \____/
    "#
    );
}
