//! 认证授权模块
//!
//! 提供 JWT 认证和守卫管线：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`ensure_owner`] - 邮箱归属检查
//! - [`Guard`] / [`GuardedRouter`] - 路由守卫管线

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod pipeline;

pub use jwt::{Claims, CurrentUser, IdentityPayload, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_query_email_owner};
pub use ownership::ensure_owner;
pub use pipeline::{Guard, GuardedRouter, Pipeline};
