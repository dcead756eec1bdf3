//! Content store contract
//!
//! The merge pipeline only needs one thing from storage: the bytes behind an
//! evidence id. A store returning `None` means "nothing to merge" and the
//! evidence is skipped. Store errors are treated the same way.

use crate::decode::EvidencePayload;
use crate::evidence::EvidenceDescriptor;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Resolve an evidence id to its content, `Ok(None)` when there is none
    async fn fetch(&self, id: &str) -> Result<Option<EvidencePayload>, StoreError>;
}

/// Fetch the content for `descriptor`, folding store errors into absence
pub async fn retrieve<S>(store: &S, descriptor: &EvidenceDescriptor) -> Option<EvidencePayload>
where
    S: ContentStore + ?Sized,
{
    match store.fetch(&descriptor.id).await {
        Ok(Some(payload)) => Some(payload),
        Ok(None) => {
            tracing::debug!(id = %descriptor.id, "No content stored for evidence, skipping");
            None
        }
        Err(e) => {
            tracing::warn!(
                id = %descriptor.id,
                name = %descriptor.name,
                "Content store failed, skipping evidence: {}",
                e
            );
            None
        }
    }
}

/// HashMap-backed store
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    entries: HashMap<String, EvidencePayload>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, payload: EvidencePayload) {
        self.entries.insert(id.into(), payload);
    }

    pub fn with_binary(mut self, id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(id, EvidencePayload::Binary(bytes));
        self
    }

    pub fn with_text(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, EvidencePayload::Text(text.into()));
        self
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch(&self, id: &str) -> Result<Option<EvidencePayload>, StoreError> {
        Ok(self.entries.get(id).cloned())
    }
}

/// Store that maps each evidence id to a file directly under `root`.
///
/// Files holding a `data:` URL are returned as text payloads, everything
/// else as binary.
#[derive(Debug, Clone)]
pub struct DirContentStore {
    root: PathBuf,
}

impl DirContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ContentStore for DirContentStore {
    async fn fetch(&self, id: &str) -> Result<Option<EvidencePayload>, StoreError> {
        if !is_plain_file_name(id) {
            tracing::warn!(id, "Evidence id is not a plain file name, ignoring");
            return Ok(None);
        }

        match tokio::fs::read(self.root.join(id)).await {
            Ok(bytes) => Ok(Some(payload_from_file(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }
}

fn is_plain_file_name(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(&['/', '\\', '\0'][..])
}

fn payload_from_file(bytes: Vec<u8>) -> EvidencePayload {
    if !bytes.starts_with(b"data:") {
        return EvidencePayload::Binary(bytes);
    }
    match String::from_utf8(bytes) {
        Ok(text) => EvidencePayload::Text(text),
        Err(e) => EvidencePayload::Binary(e.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    #[async_trait]
    impl ContentStore for FailingStore {
        async fn fetch(&self, _id: &str) -> Result<Option<EvidencePayload>, StoreError> {
            Err("connection reset".into())
        }
    }

    fn descriptor(id: &str) -> EvidenceDescriptor {
        EvidenceDescriptor::new(id, format!("{}.bin", id), "")
    }

    #[tokio::test]
    async fn test_memory_store_hit_and_miss() {
        let store = MemoryContentStore::new().with_binary("a", vec![1, 2]);

        assert_eq!(
            retrieve(&store, &descriptor("a")).await,
            Some(EvidencePayload::Binary(vec![1, 2]))
        );
        assert_eq!(retrieve(&store, &descriptor("b")).await, None);
    }

    #[tokio::test]
    async fn test_store_error_is_absence() {
        assert_eq!(retrieve(&FailingStore, &descriptor("a")).await, None);
    }

    #[tokio::test]
    async fn test_dir_store_reads_binary_and_data_urls() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scan"), b"%PDF-1.7 ...").unwrap();
        std::fs::write(dir.path().join("photo"), "data:image/png;base64,aGk=").unwrap();
        let store = DirContentStore::new(dir.path());

        assert_eq!(
            store.fetch("scan").await.unwrap(),
            Some(EvidencePayload::Binary(b"%PDF-1.7 ...".to_vec()))
        );
        assert_eq!(
            store.fetch("photo").await.unwrap(),
            Some(EvidencePayload::Text("data:image/png;base64,aGk=".into()))
        );
        assert_eq!(store.fetch("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dir_store_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("store");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret"), b"secret").unwrap();
        let store = DirContentStore::new(&inner);

        assert_eq!(store.fetch("../secret").await.unwrap(), None);
        assert_eq!(store.fetch("..").await.unwrap(), None);
        assert_eq!(store.fetch("").await.unwrap(), None);
    }

    #[test]
    fn test_non_utf8_data_prefix_stays_binary() {
        let mut bytes = b"data:".to_vec();
        bytes.push(0xff);
        assert_eq!(
            payload_from_file(bytes.clone()),
            EvidencePayload::Binary(bytes)
        );
    }
}
