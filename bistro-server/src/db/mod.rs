//! Database Module
//!
//! Handles the SurrealDB connection and schema definition

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;

use crate::core::DbConfig;
use crate::utils::AppError;

/// Schema applied on every start; all statements are idempotent
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS users SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS menu SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS reviews SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS carts SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS users_email_unique ON TABLE users COLUMNS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS carts_email ON TABLE carts COLUMNS email;
"#;

/// Database service — owns the process-wide SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Any>,
}

impl DbService {
    /// Connect, sign in (when credentials are configured), select ns/db and
    /// define the schema
    pub async fn connect(config: &DbConfig) -> Result<Self, AppError> {
        let db = any::connect(config.url.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {}: {e}", config.url)))?;

        if let Some((username, password)) = config.credentials() {
            db.signin(Root { username, password })
                .await
                .map_err(|e| AppError::database(format!("Database sign-in failed: {e}")))?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace/database: {e}")))?;

        tracing::info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Database connection established"
        );

        define_schema(&db).await?;
        tracing::info!("Database schema ready");

        Ok(Self { db })
    }

    /// Fresh in-memory database (tests, local runs)
    pub async fn memory() -> Result<Self, AppError> {
        Self::connect(&DbConfig::memory()).await
    }
}

async fn define_schema(db: &Surreal<Any>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
