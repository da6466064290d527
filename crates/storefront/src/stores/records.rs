//! Durable append-only record storage.
//!
//! Orders, reviews, and contact messages are write-once records. The
//! production backend appends JSON lines to per-kind files under the
//! configured data directory; tests use the in-memory backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::OrderSnapshot;

use super::StoreError;

/// Kinds of user-submitted records besides orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Review,
    Contact,
}

impl RecordKind {
    /// File name for this kind in the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Review => "reviews.jsonl",
            Self::Contact => "contacts.jsonl",
        }
    }
}

/// A submitted review or contact message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    /// Display attribution: the reviewer's username, or "Name (email)"
    /// for contact messages.
    pub author: String,
    pub body: String,
    pub submitted_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(author: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            body,
            submitted_at: Utc::now(),
        }
    }
}

/// Durable storage for orders, reviews, and contact messages.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a placed order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails. The order workflow
    /// logs and swallows this - a lost write never reaches the user.
    async fn put_order(&self, order: &OrderSnapshot) -> Result<(), StoreError>;

    /// Append a review or contact record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn append(&self, kind: RecordKind, record: &StoredRecord) -> Result<(), StoreError>;

    /// List all records of a kind, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails. Callers render an empty
    /// list with an error note rather than failing the page.
    async fn scan(&self, kind: RecordKind) -> Result<Vec<StoredRecord>, StoreError>;
}

// =============================================================================
// JSONL backend
// =============================================================================

/// Append-only JSON-lines files under a data directory.
#[derive(Debug)]
pub struct JsonlRecordStore {
    data_dir: PathBuf,
}

impl JsonlRecordStore {
    const ORDERS_FILE: &'static str = "orders.jsonl";

    /// Open a store rooted at `data_dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir).await?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    async fn append_line(&self, file_name: &str, json: String) -> Result<(), StoreError> {
        let path = self.data_dir.join(file_name);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(json.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonlRecordStore {
    async fn put_order(&self, order: &OrderSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(order)?;
        self.append_line(Self::ORDERS_FILE, json).await
    }

    async fn append(&self, kind: RecordKind, record: &StoredRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        self.append_line(kind.file_name(), json).await
    }

    async fn scan(&self, kind: RecordKind) -> Result<Vec<StoredRecord>, StoreError> {
        let path = self.data_dir.join(kind.file_name());
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            match serde_json::from_str::<StoredRecord>(line) {
                Ok(record) => records.push(record),
                // A torn or hand-edited line loses itself, not the page.
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "Skipping unreadable record line");
                }
            }
        }
        Ok(records)
    }
}

// =============================================================================
// In-memory backend
// =============================================================================

/// In-memory record store for tests.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    orders: RwLock<Vec<OrderSnapshot>>,
    records: RwLock<HashMap<RecordKind, Vec<StoredRecord>>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all persisted orders.
    pub async fn orders(&self) -> Vec<OrderSnapshot> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put_order(&self, order: &OrderSnapshot) -> Result<(), StoreError> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn append(&self, kind: RecordKind, record: &StoredRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn scan(&self, kind: RecordKind) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("spicejar-store-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_append_and_scan() {
        let store = MemoryRecordStore::new();
        let record = StoredRecord::new("priya".to_string(), "Loved the mango pickle".to_string());

        store.append(RecordKind::Review, &record).await.unwrap();
        let reviews = store.scan(RecordKind::Review).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews.first().unwrap().author, "priya");

        // Kinds are separate streams.
        assert!(store.scan(RecordKind::Contact).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_jsonl_roundtrip() {
        let dir = temp_dir();
        let store = JsonlRecordStore::open(&dir).await.unwrap();

        let first = StoredRecord::new("priya".to_string(), "Crunchy and fresh".to_string());
        let second = StoredRecord::new("ravi".to_string(), "Too spicy for me".to_string());
        store.append(RecordKind::Review, &first).await.unwrap();
        store.append(RecordKind::Review, &second).await.unwrap();

        let reviews = store.scan(RecordKind::Review).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews.first().unwrap().id, first.id);
        assert_eq!(reviews.get(1).unwrap().id, second.id);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_jsonl_scan_missing_file_is_empty() {
        let dir = temp_dir();
        let store = JsonlRecordStore::open(&dir).await.unwrap();
        assert!(store.scan(RecordKind::Contact).await.unwrap().is_empty());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_jsonl_scan_skips_corrupt_lines() {
        let dir = temp_dir();
        let store = JsonlRecordStore::open(&dir).await.unwrap();

        let record = StoredRecord::new("priya".to_string(), "ok".to_string());
        store.append(RecordKind::Review, &record).await.unwrap();
        tokio::fs::OpenOptions::new()
            .append(true)
            .open(dir.join(RecordKind::Review.file_name()))
            .await
            .unwrap()
            .write_all(b"not json\n")
            .await
            .unwrap();

        let reviews = store.scan(RecordKind::Review).await.unwrap();
        assert_eq!(reviews.len(), 1);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
