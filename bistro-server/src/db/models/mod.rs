//! Database Models
//!
//! 记录 id 对外统一为 `_id: "table:key"` 字符串。

pub mod cart;
pub mod document;
pub mod user;

pub use cart::{CartItem, CartItemCreate};
pub use document::Document;
pub use user::{User, UserCreate};

/// 菜单条目 (只读，由运营数据导入)
pub type MenuItem = Document;

/// 顾客评价 (只读)
pub type Review = Document;
