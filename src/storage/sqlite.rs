use std::str::FromStr;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::{Form, ResponseEntry, Storage};
use crate::config::DatabaseConfig;
use crate::error::{StorageError, StorageResult};

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed storage implementation
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    pub async fn new(config: &DatabaseConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Create an in-memory storage instance, for tests.
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .foreign_keys(true);

        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Run database migrations using embedded sqlx migrations
    async fn run_migrations(&self) -> StorageResult<()> {
        info!("Running database migrations...");

        MIGRATOR.run(&self.pool).await.map_err(|e| StorageError::Migration {
            message: format!("Failed to run migrations: {}", e),
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_form(&self, prompt: &str) -> StorageResult<Form> {
        let form = Form::new(prompt);

        sqlx::query(
            r#"
            INSERT INTO forms (id, prompt, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&form.id)
        .bind(&form.prompt)
        .bind(form.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(form)
    }

    async fn get_form(&self, id: &str) -> StorageResult<Option<Form>> {
        let row: Option<FormRow> = sqlx::query_as(
            r#"
            SELECT id, prompt, created_at
            FROM forms
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        // UUIDv7 primary keys sort by creation time, so ordering by id is
        // insertion order.
        let responses: Vec<ResponseRow> = sqlx::query_as(
            r#"
            SELECT id, form_id, text, created_at
            FROM responses
            WHERE form_id = ?
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut form: Form = row.into();
        form.responses = responses.into_iter().map(Into::into).collect();

        Ok(Some(form))
    }

    async fn create_response(&self, form_id: &str, text: &str) -> StorageResult<ResponseEntry> {
        let response = ResponseEntry::new(form_id, text);

        sqlx::query(
            r#"
            INSERT INTO responses (id, form_id, text, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&response.id)
        .bind(&response.form_id)
        .bind(&response.text)
        .bind(response.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(response)
    }
}

// Internal row types for SQLx mapping
#[derive(sqlx::FromRow)]
struct FormRow {
    id: String,
    prompt: String,
    created_at: String,
}

impl From<FormRow> for Form {
    fn from(row: FormRow) -> Self {
        Self {
            id: row.id,
            prompt: row.prompt,
            created_at: parse_timestamp(&row.created_at),
            responses: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: String,
    form_id: String,
    text: String,
    created_at: String,
}

impl From<ResponseRow> for ResponseEntry {
    fn from(row: ResponseRow) -> Self {
        Self {
            id: row.id,
            form_id: row.form_id,
            text: row.text,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

fn parse_timestamp(raw: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now())
}
