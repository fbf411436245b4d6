//! Document repository abstraction.
//!
//! Games and players are persisted as versioned JSON documents. The version
//! doubles as an optimistic concurrency token: a writer states the version it
//! loaded and the save is refused if someone else got there first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Document identifier.
    pub id: Uuid,
    /// Number of successful saves of this document.
    pub version: i64,
    /// Timestamp of the last save.
    pub updated_at: DateTime<Utc>,
    /// Serialized document body.
    pub data: serde_json::Value,
}

/// Repository trait for loading and saving versioned documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Load a single document, or `None` if it does not exist.
    async fn load(&self, id: Uuid) -> Result<Option<StoredDocument>, DomainError>;

    /// Load every document in the collection.
    async fn load_all(&self) -> Result<Vec<StoredDocument>, DomainError>;

    /// Save a document with optimistic concurrency.
    /// `expected_version` is the version the caller loaded; `0` means the
    /// document must not exist yet.
    async fn save(
        &self,
        id: Uuid,
        expected_version: i64,
        data: serde_json::Value,
        saved_at: DateTime<Utc>,
    ) -> Result<StoredDocument, DomainError>;

    /// Remove a document. Removing a missing document is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
