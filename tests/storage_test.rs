//! Integration tests for the SQLite storage layer
//!
//! Tests database operations using an in-memory SQLite database.

use formwell::storage::{SqliteStorage, Storage};

/// Create an in-memory storage instance for testing
async fn create_test_storage() -> SqliteStorage {
    SqliteStorage::new_in_memory()
        .await
        .expect("Failed to create in-memory storage")
}

#[cfg(test)]
mod form_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_form() {
        let storage = create_test_storage().await;

        let form = storage.create_form("Favorite color?").await.unwrap();

        assert!(!form.id.is_empty());
        assert_eq!(form.prompt, "Favorite color?");
        assert!(form.responses.is_empty(), "New form has no responses");
    }

    #[tokio::test]
    async fn test_create_form_ids_unique() {
        let storage = create_test_storage().await;

        let first = storage.create_form("one").await.unwrap();
        let second = storage.create_form("one").await.unwrap();

        assert_ne!(first.id, second.id, "Ids are never reused");
    }

    #[tokio::test]
    async fn test_get_form_roundtrip() {
        let storage = create_test_storage().await;

        let created = storage.create_form("Favorite color?").await.unwrap();
        let fetched = storage.get_form(&created.id).await.unwrap();

        assert!(fetched.is_some(), "Form should exist");
        let fetched = fetched.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.prompt, "Favorite color?");
        assert!(fetched.responses.is_empty());
    }

    #[tokio::test]
    async fn test_get_nonexistent_form() {
        let storage = create_test_storage().await;

        let result = storage.get_form("nonexistent-id").await.unwrap();

        assert!(result.is_none(), "Miss is None, not an error");
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;
    use formwell::config::DatabaseConfig;

    #[tokio::test]
    async fn test_on_disk_database_auto_created_and_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("nested").join("forms.db"),
            max_connections: 2,
        };

        let storage = SqliteStorage::new(&config).await.unwrap();
        let form = storage.create_form("persisted?").await.unwrap();
        drop(storage);

        // Reopen the same file and read the form back.
        let storage = SqliteStorage::new(&config).await.unwrap();
        let fetched = storage.get_form(&form.id).await.unwrap();

        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().prompt, "persisted?");
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_response() {
        let storage = create_test_storage().await;

        let form = storage.create_form("q").await.unwrap();
        let response = storage.create_response(&form.id, "Blue").await.unwrap();

        assert!(!response.id.is_empty());
        assert_eq!(response.form_id, form.id);
        assert_eq!(response.text, "Blue");
    }

    #[tokio::test]
    async fn test_get_form_includes_responses_in_order() {
        let storage = create_test_storage().await;

        let form = storage.create_form("q").await.unwrap();
        storage.create_response(&form.id, "first").await.unwrap();
        storage.create_response(&form.id, "second").await.unwrap();
        storage.create_response(&form.id, "third").await.unwrap();

        let fetched = storage.get_form(&form.id).await.unwrap().unwrap();

        let texts: Vec<&str> = fetched.responses.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_collection_grows_by_one_per_call() {
        let storage = create_test_storage().await;

        let form = storage.create_form("q").await.unwrap();

        for expected in 1..=5 {
            storage.create_response(&form.id, "another").await.unwrap();
            let fetched = storage.get_form(&form.id).await.unwrap().unwrap();
            assert_eq!(fetched.responses.len(), expected);
        }
    }

    #[tokio::test]
    async fn test_responses_scoped_to_their_form() {
        let storage = create_test_storage().await;

        let form_a = storage.create_form("a").await.unwrap();
        let form_b = storage.create_form("b").await.unwrap();
        storage.create_response(&form_a.id, "for a").await.unwrap();

        let fetched_a = storage.get_form(&form_a.id).await.unwrap().unwrap();
        let fetched_b = storage.get_form(&form_b.id).await.unwrap().unwrap();

        assert_eq!(fetched_a.responses.len(), 1);
        assert!(fetched_b.responses.is_empty());
    }

    #[tokio::test]
    async fn test_response_to_unknown_form_rejected_by_constraint() {
        let storage = create_test_storage().await;

        // Handlers look the form up first, but the schema backs them up.
        let result = storage.create_response("no-such-form", "text").await;

        assert!(result.is_err());
    }
}
