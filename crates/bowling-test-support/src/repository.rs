//! Test repositories: mock `DocumentRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bowling_core::error::DomainError;
use bowling_core::repository::{DocumentRepository, StoredDocument};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::fixed_now;

/// A document repository that keeps everything in memory and honours the
/// same version checks as the file-backed store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: Mutex<HashMap<Uuid, StoredDocument>>,
    saves: Mutex<Vec<(Uuid, i64)>>,
}

impl InMemoryDocumentRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `data` at version 1 under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_document(id: Uuid, data: serde_json::Value) -> Self {
        let repo = Self::new();
        repo.documents.lock().unwrap().insert(
            id,
            StoredDocument {
                id,
                version: 1,
                updated_at: fixed_now(),
                data,
            },
        );
        repo
    }

    /// Returns a snapshot of the `(id, expected_version)` pairs of every
    /// successful save.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn saves(&self) -> Vec<(Uuid, i64)> {
        self.saves.lock().unwrap().clone()
    }

    /// Returns the stored document for `id`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn document(&self, id: Uuid) -> Option<StoredDocument> {
        self.documents.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn load(&self, id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        Ok(self.documents.lock().unwrap().get(&id).cloned())
    }

    async fn load_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        Ok(self.documents.lock().unwrap().values().cloned().collect())
    }

    async fn save(
        &self,
        id: Uuid,
        expected_version: i64,
        data: serde_json::Value,
        saved_at: DateTime<Utc>,
    ) -> Result<StoredDocument, DomainError> {
        let mut documents = self.documents.lock().unwrap();
        let actual = documents.get(&id).map_or(0, |doc| doc.version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                id,
                expected: expected_version,
                actual,
            });
        }
        let stored = StoredDocument {
            id,
            version: actual + 1,
            updated_at: saved_at,
            data,
        };
        documents.insert(id, stored.clone());
        self.saves.lock().unwrap().push((id, expected_version));
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.documents.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// A document repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingDocumentRepository;

#[async_trait]
impl DocumentRepository for FailingDocumentRepository {
    async fn load(&self, _id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }

    async fn load_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }

    async fn save(
        &self,
        _id: Uuid,
        _expected_version: i64,
        _data: serde_json::Value,
        _saved_at: DateTime<Utc>,
    ) -> Result<StoredDocument, DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }
}
