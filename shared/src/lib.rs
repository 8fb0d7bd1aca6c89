//! Shared types for the Bistro backend
//!
//! Error taxonomy, API response envelope and the wire-level models that
//! both the server and its tests speak.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
