//! User Repository

use std::time::Duration;

use super::{BaseRepository, DOCUMENT_PROJECTION, RecordRef, RepoError, RepoResult, record_id};
use crate::db::models::{User, UserCreate};
use rand::Rng;
use serde_json::Value;
use surrealdb::engine::any::Any;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "users";

/// Attempts before a conflicting sign-in gives up
const SIGN_IN_ATTEMPTS: u32 = 24;
const SIGN_IN_BACKOFF_MS: u64 = 4;

/// Outcome of [`UserRepository::sign_in`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    /// First sign-in, a user was inserted
    Created(RecordId),
    /// The email was already known; `matched` reports whether the touch hit a row
    Existing { matched: bool },
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        self.base.select_all(TABLE).await
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {DOCUMENT_PROJECTION} FROM users WHERE email = $email LIMIT 1"
            ))
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Insert a new user
    ///
    /// Fails with [`RepoError::Duplicate`] when the email is already taken
    /// (unique index `users_email_unique`).
    pub async fn create(&self, data: UserCreate) -> RepoResult<RecordId> {
        let mut result = self
            .base
            .db()
            .query("CREATE users CONTENT $data RETURN id")
            .bind(("data", data))
            .await?;

        // Index violations surface per statement, not on the round-trip
        let created: Vec<RecordRef> = result.take(0)?;
        created
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Record a repeated sign-in: only the two update timestamps change
    ///
    /// Absent timestamps keep their stored value. Returns whether a user matched.
    pub async fn touch_sign_in(
        &self,
        email: &str,
        updated_at: Option<Value>,
        updated_local: Option<Value>,
    ) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE users SET
                    updatedAt = $updated_at OR updatedAt,
                    updatedLocal = $updated_local OR updatedLocal
                WHERE email = $email
                RETURN AFTER"#,
            )
            .bind(("email", email.to_string()))
            .bind(("updated_at", updated_at))
            .bind(("updated_local", updated_local))
            .await?;
        let updated: Vec<RecordRef> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Insert-or-touch by email
    ///
    /// Concurrent first sign-ins for one email race on the unique index or
    /// lose an optimistic transaction. Both outcomes are retried until the
    /// request settles as [`SignIn::Created`] or [`SignIn::Existing`].
    pub async fn sign_in(&self, data: UserCreate) -> RepoResult<SignIn> {
        let mut attempt = 1;
        loop {
            match self.try_sign_in(data.clone()).await {
                Err(RepoError::Conflict(msg)) if attempt < SIGN_IN_ATTEMPTS => {
                    tracing::debug!(email = %data.email, attempt, error = %msg, "Sign-in conflict, retrying");
                    let jitter = rand::thread_rng().gen_range(0..SIGN_IN_BACKOFF_MS * 2);
                    let delay = SIGN_IN_BACKOFF_MS * u64::from(attempt.min(8)) + jitter;
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn try_sign_in(&self, data: UserCreate) -> RepoResult<SignIn> {
        let updated_at = data.updated_at();
        let updated_local = data.updated_local();
        let email = data.email.clone();

        if self.find_by_email(&email).await?.is_none() {
            match self.create(data).await {
                Ok(id) => return Ok(SignIn::Created(id)),
                Err(RepoError::Duplicate(_)) => {
                    tracing::debug!(email = %email, "Concurrent sign-in lost the insert race");
                }
                Err(e) => return Err(e),
            }
        }

        let matched = self
            .touch_sign_in(&email, updated_at, updated_local)
            .await?;
        Ok(SignIn::Existing { matched })
    }

    /// Promote a user to admin, stamping `roleUpdated`
    ///
    /// Returns whether the id matched a user.
    pub async fn promote_to_admin(&self, id: &str) -> RepoResult<bool> {
        let thing = record_id(TABLE, id)?;
        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET role = 'admin', roleUpdated = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("now", now))
            .await?;
        let updated: Vec<RecordRef> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Delete a user by id
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = record_id(TABLE, id)?;
        self.base.delete_record(thing).await
    }
}
