//! Write results
//!
//! Every write endpoint answers with the outcome of its single database
//! operation, in the camelCase shape the storefront already consumes.

use serde::{Deserialize, Serialize};

/// Outcome of an insert-one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOneResult {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Outcome of an update-one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    /// Update of a single record; `matched` is whether the record existed
    pub fn single(matched: bool) -> Self {
        let count = u64::from(matched);
        Self {
            acknowledged: true,
            matched_count: count,
            modified_count: count,
            upserted_id: None,
        }
    }
}

/// Outcome of a delete-one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn single(deleted: bool) -> Self {
        Self {
            acknowledged: true,
            deleted_count: u64::from(deleted),
        }
    }
}

/// First element of the "user already exists" answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingUserNotice {
    pub message: String,
    pub inserted_id: Option<String>,
}

impl Default for ExistingUserNotice {
    fn default() -> Self {
        Self {
            message: "User already exists".to_string(),
            inserted_id: None,
        }
    }
}

/// POST /users response
///
/// A fresh sign-in serializes as the insert result; a returning user
/// serializes as the two-element array `[notice, update result]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    AlreadyExists(ExistingUserNotice, UpdateResult),
    Inserted(InsertOneResult),
}

impl CreateUserResponse {
    pub fn already_exists(update: UpdateResult) -> Self {
        Self::AlreadyExists(ExistingUserNotice::default(), update)
    }
}
