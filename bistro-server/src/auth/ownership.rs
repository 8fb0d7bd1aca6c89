//! 邮箱归属检查
//!
//! 请求里携带的 email (查询参数或路径) 必须和令牌里的 email 一致。

use crate::auth::CurrentUser;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// 校验请求中的 email 属于当前用户
///
/// 缺失的 email 与不匹配同样视为 403。比较是精确字符串比较。
pub fn ensure_owner(user: &CurrentUser, requested: Option<&str>) -> AppResult<()> {
    match requested {
        Some(email) if email == user.email => Ok(()),
        Some(email) => {
            security_log!(
                WARN,
                "email_mismatch",
                token_email = user.email.clone(),
                requested_email = email.to_string()
            );
            Err(AppError::forbidden(format!(
                "{} may not access data of {}",
                user.email, email
            )))
        }
        None => {
            security_log!(WARN, "email_missing", token_email = user.email.clone());
            Err(AppError::forbidden("request carries no email"))
        }
    }
}
