//! User Model

use super::document::strip_keys;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::models::Role;

/// 站点用户 (以 email 为身份主键)
///
/// 时间戳由前端提供，原样存储；`roleUpdated` 由服务端在提升管理员时写入。
/// 除 `email` / `role` 外的字段不做类型约束。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.as_deref().map(Role::from).unwrap_or(Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Keys a sign-in may never set
const SERVER_OWNED: &[&str] = &["id", "_id", "role", "roleUpdated"];

/// Sign-in payload (`POST /users`)
///
/// Promotion only happens through the admin route, so `role` is dropped here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SignInPayload")]
pub struct UserCreate {
    pub email: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct SignInPayload {
    email: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<SignInPayload> for UserCreate {
    fn from(SignInPayload { email, mut fields }: SignInPayload) -> Self {
        strip_keys(&mut fields, SERVER_OWNED);
        Self { email, fields }
    }
}

impl UserCreate {
    pub fn updated_at(&self) -> Option<Value> {
        self.fields.get("updatedAt").cloned()
    }

    pub fn updated_local(&self) -> Option<Value> {
        self.fields.get("updatedLocal").cloned()
    }
}
