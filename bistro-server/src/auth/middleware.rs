//! 认证授权检查
//!
//! 每个检查都作用在请求头部 ([`Parts`]) 上，供 [`Guard`](crate::auth::Guard)
//! 管线和 handler 内联调用。

use axum::extract::Query;
use axum::http::request::Parts;
use serde::Deserialize;

use crate::auth::{CurrentUser, JwtError, JwtService, ensure_owner};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// 认证 - 要求有效的 Bearer 令牌
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 成功后把 [`CurrentUser`] 放进请求扩展。已认证的请求直接复用。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 头格式错误 / 签名错误 | 401 TokenInvalid |
/// | 令牌过期 | 401 TokenExpired |
pub fn require_auth(state: &ServerState, parts: &mut Parts) -> AppResult<CurrentUser> {
    if let Some(user) = parts.extensions.get::<CurrentUser>() {
        return Ok(user.clone());
    }

    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or_else(|| {
            security_log!(WARN, "auth_malformed", uri = parts.uri.to_string());
            AppError::invalid_token("Invalid authorization header")
        })?,
        None => {
            security_log!(WARN, "auth_missing", uri = parts.uri.to_string());
            return Err(AppError::unauthorized());
        }
    };

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            parts.extensions.insert(user.clone());
            Ok(user)
        }
        Err(e) => {
            security_log!(
                WARN,
                "auth_failed",
                error = e.to_string(),
                uri = parts.uri.to_string()
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token(format!("Invalid token: {e}"))),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

/// 归属检查 - `?email=` 必须是当前用户自己的邮箱
///
/// 必须在 [`require_auth`] 之后执行，否则返回 401。
pub fn require_query_email_owner(parts: &Parts) -> AppResult<()> {
    let user = parts
        .extensions
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    let email = Query::<EmailQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.email);

    ensure_owner(user, email.as_deref())
}

/// 管理员检查 - 当前用户在数据库中的角色必须是 admin
///
/// 每次请求都读一次数据库，角色变更立即生效。
/// 用户记录不存在与非管理员同样返回 403。
pub async fn require_admin(state: &ServerState, parts: &Parts) -> AppResult<()> {
    let user = parts
        .extensions
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    let stored = UserRepository::new(state.db.clone())
        .find_by_email(&user.email)
        .await?;

    match stored {
        Some(record) if record.is_admin() => Ok(()),
        Some(record) => {
            security_log!(
                WARN,
                "admin_required",
                email = user.email.clone(),
                user_role = record.role().as_str()
            );
            Err(AppError::admin_required(format!("{} is not an admin", user.email)))
        }
        None => {
            security_log!(WARN, "admin_required", email = user.email.clone(), user_role = "none");
            Err(AppError::admin_required(format!("{} has no user record", user.email)))
        }
    }
}
