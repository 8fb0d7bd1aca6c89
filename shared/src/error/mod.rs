//! Unified error system
//!
//! - [`ErrorCode`]: standardized error codes
//! - [`ErrorCategory`]: classification of errors by range
//! - [`AppError`]: error type with code and internal message
//! - [`ApiResponse`]: error body sent to clients
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors (401)
//! - 2xxx: Permission errors (403)
//! - 9xxx: System errors (500)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::database("connection refused");
//! assert_eq!(err.code, ErrorCode::DatabaseError);
//!
//! // Internal detail never reaches the body
//! let body = ApiResponse::error(&err);
//! assert_eq!(body.message, "Internal Server Error");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
