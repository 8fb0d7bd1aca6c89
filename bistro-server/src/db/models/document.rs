//! Document Model
//!
//! 菜单、评价、购物车条目都是不透明文档：服务端只关心 `_id`，
//! 其余字段 (类型也不校验) 原样写入、原样返回。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 不透明文档
///
/// `_id` 由查询投影成 "table:key" 字符串，见
/// [`DOCUMENT_PROJECTION`](crate::db::repository::DOCUMENT_PROJECTION)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

/// Drop keys the server owns from a client payload
pub(crate) fn strip_keys(fields: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        fields.remove(*key);
    }
}
