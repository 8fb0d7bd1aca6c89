//! Cart Item Model

use super::document::{Document, strip_keys};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 购物车条目，`email` 字段是所有者
pub type CartItem = Document;

/// Add-to-cart payload
///
/// 只要求 `email`；`menuId`、`quantity` 等其它字段原样保存，
/// `menuId` 只是引用，不做存在性校验。客户端不能指定记录 id。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CartPayload")]
pub struct CartItemCreate {
    pub email: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct CartPayload {
    email: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<CartPayload> for CartItemCreate {
    fn from(CartPayload { email, mut fields }: CartPayload) -> Self {
        strip_keys(&mut fields, &["id", "_id"]);
        Self { email, fields }
    }
}
