//! JSON-file implementation of the `DocumentRepository` trait.
//!
//! One file holds one collection as a JSON object keyed by document id:
//!
//! ```json
//! { "<uuid>": { "version": 3, "updated_at": "...", "data": { "rolls": [10, 7, 3] } } }
//! ```
//!
//! The whole collection is cached in memory behind an async mutex and
//! rewritten on every change. Writes go to a sibling `.tmp` file that is then
//! renamed over the collection file, so a crash mid-write leaves the previous
//! contents intact.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bowling_core::error::DomainError;
use bowling_core::repository::{DocumentRepository, StoredDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DiskEntry {
    version: i64,
    updated_at: DateTime<Utc>,
    data: serde_json::Value,
}

type Collection = BTreeMap<Uuid, DiskEntry>;

/// File-backed document repository.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    documents: Mutex<Collection>,
}

fn io_error(path: &Path, err: &io::Error) -> DomainError {
    DomainError::Infrastructure(format!("{}: {err}", path.display()))
}

fn to_stored(id: Uuid, entry: &DiskEntry) -> StoredDocument {
    StoredDocument {
        id,
        version: entry.version,
        updated_at: entry.updated_at,
        data: entry.data.clone(),
    }
}

impl JsonFileRepository {
    /// Opens the collection at `path`, creating the file (and its directory)
    /// with an empty collection if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file cannot be read or
    /// created, or does not hold a valid collection.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let documents = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Collection::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                DomainError::Infrastructure(format!("{}: invalid collection: {e}", path.display()))
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| io_error(parent, &e))?;
                }
                let empty = Collection::new();
                write_atomic(&path, &empty).await?;
                info!(path = %path.display(), "created empty collection");
                empty
            }
            Err(err) => return Err(io_error(&path, &err)),
        };

        debug!(path = %path.display(), documents = documents.len(), "collection loaded");
        Ok(Self {
            path,
            documents: Mutex::new(documents),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn write_atomic(path: &Path, documents: &Collection) -> Result<(), DomainError> {
    let bytes = serde_json::to_vec_pretty(documents)
        .map_err(|e| DomainError::Infrastructure(format!("collection serialization failed: {e}")))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)
        .await
        .map_err(|e| io_error(&tmp, &e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, &e))?;
    Ok(())
}

#[async_trait]
impl DocumentRepository for JsonFileRepository {
    async fn load(&self, id: Uuid) -> Result<Option<StoredDocument>, DomainError> {
        let documents = self.documents.lock().await;
        Ok(documents.get(&id).map(|entry| to_stored(id, entry)))
    }

    async fn load_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        let documents = self.documents.lock().await;
        Ok(documents
            .iter()
            .map(|(id, entry)| to_stored(*id, entry))
            .collect())
    }

    async fn save(
        &self,
        id: Uuid,
        expected_version: i64,
        data: serde_json::Value,
        saved_at: DateTime<Utc>,
    ) -> Result<StoredDocument, DomainError> {
        let mut documents = self.documents.lock().await;
        let actual = documents.get(&id).map_or(0, |entry| entry.version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                id,
                expected: expected_version,
                actual,
            });
        }

        let entry = DiskEntry {
            version: actual + 1,
            updated_at: saved_at,
            data,
        };
        let mut next = documents.clone();
        next.insert(id, entry.clone());
        write_atomic(&self.path, &next).await?;
        *documents = next;

        debug!(%id, version = entry.version, path = %self.path.display(), "document saved");
        Ok(to_stored(id, &entry))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut documents = self.documents.lock().await;
        if !documents.contains_key(&id) {
            return Ok(());
        }

        let mut next = documents.clone();
        next.remove(&id);
        write_atomic(&self.path, &next).await?;
        *documents = next;

        debug!(%id, path = %self.path.display(), "document deleted");
        Ok(())
    }
}
