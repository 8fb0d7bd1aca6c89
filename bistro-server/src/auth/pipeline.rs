//! 守卫管线
//!
//! 路由前面挂一串有序的 [`Guard`]，按顺序执行，第一个失败就短路返回错误响应。
//!
//! ```ignore
//! Router::new()
//!     .route("/users", get(handler::list))
//!     .guarded(state, &[Guard::Authenticated, Guard::Admin]);
//! ```

use axum::{
    Router,
    extract::{Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::Response,
};

use super::middleware::{require_admin, require_auth, require_query_email_owner};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// 单个守卫
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// 有效的 Bearer 令牌 (401)
    Authenticated,
    /// `?email=` 属于当前用户 (403)
    QueryEmailOwner,
    /// 数据库中的角色为 admin (403)
    Admin,
}

impl Guard {
    pub async fn check(&self, state: &ServerState, parts: &mut Parts) -> AppResult<()> {
        match self {
            Guard::Authenticated => require_auth(state, parts).map(|_| ()),
            Guard::QueryEmailOwner => require_query_email_owner(parts),
            Guard::Admin => require_admin(state, parts).await,
        }
    }
}

/// 有序守卫列表
#[derive(Debug, Clone, Copy)]
pub struct Pipeline(pub &'static [Guard]);

impl Pipeline {
    /// Run every guard in order, stopping at the first rejection
    pub async fn run(&self, state: &ServerState, parts: &mut Parts) -> AppResult<()> {
        for guard in self.0 {
            guard.check(state, parts).await?;
        }
        Ok(())
    }
}

/// 中间件入口
pub async fn run_pipeline(
    State((state, pipeline)): State<(ServerState, Pipeline)>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    pipeline.run(&state, &mut parts).await?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// 给路由挂守卫
pub trait GuardedRouter {
    /// Apply `guards` to every route registered so far
    fn guarded(self, state: &ServerState, guards: &'static [Guard]) -> Self;
}

impl GuardedRouter for Router<ServerState> {
    fn guarded(self, state: &ServerState, guards: &'static [Guard]) -> Self {
        if guards.is_empty() {
            return self;
        }
        self.route_layer(middleware::from_fn_with_state(
            (state.clone(), Pipeline(guards)),
            run_pipeline,
        ))
    }
}
