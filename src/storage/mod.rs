//! Storage layer for form persistence.
//!
//! This module provides SQLite-based storage for forms and their responses,
//! the only two records this service keeps. Both are created once and never
//! updated or deleted.

mod sqlite;

pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageResult;

/// A form: a prompt plus its collected responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique, time-ordered form identifier (UUIDv7).
    pub id: String,
    /// The free-text prompt shown to respondents.
    pub prompt: String,
    /// When the form was created.
    pub created_at: DateTime<Utc>,
    /// Responses in insertion order. Empty on a freshly created form.
    pub responses: Vec<ResponseEntry>,
}

/// One text answer attached to exactly one form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// Unique, time-ordered response identifier (UUIDv7).
    pub id: String,
    /// The owning form's id.
    pub form_id: String,
    /// The free-text answer.
    pub text: String,
    /// When the response was submitted.
    pub created_at: DateTime<Utc>,
}

impl Form {
    /// Create a new form record with a fresh id and no responses.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            prompt: prompt.into(),
            created_at: Utc::now(),
            responses: Vec::new(),
        }
    }
}

impl ResponseEntry {
    /// Create a new response record with a fresh id.
    pub fn new(form_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            form_id: form_id.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Storage operations used by the HTTP layer.
///
/// Referential integrity between responses and forms is enforced both by the
/// calling sequence (handlers look the form up before inserting) and by the
/// foreign-key constraint in the schema.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Allocate an id, store the prompt, and return the stored form with an
    /// empty response collection.
    async fn create_form(&self, prompt: &str) -> StorageResult<Form>;

    /// Look a form up by primary key, eagerly loading its responses in
    /// insertion order. A miss is `Ok(None)`, not an error.
    async fn get_form(&self, id: &str) -> StorageResult<Option<Form>>;

    /// Allocate an id and insert a response referencing `form_id`.
    async fn create_response(&self, form_id: &str, text: &str) -> StorageResult<ResponseEntry>;
}
