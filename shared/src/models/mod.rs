//! Wire-level models
//!
//! Request and response shapes that are independent of the storage layer.

pub mod auth;
pub mod role;
pub mod write_result;

// Re-exports
pub use auth::{AdminStatus, TokenResponse};
pub use role::Role;
pub use write_result::{
    CreateUserResponse, DeleteResult, ExistingUserNotice, InsertOneResult, UpdateResult,
};
