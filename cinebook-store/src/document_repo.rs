use async_trait::async_trait;
use cinebook_core::invoice::{InvoiceDocument, InvoiceHandle};
use cinebook_core::repository::DocumentStore;
use cinebook_core::BackendError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Invoices as files in one directory, named by their handle.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Creates the directory if it does not exist yet.
    pub async fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!("Invoice directory ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, handle: &InvoiceHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn put(&self, document: &InvoiceDocument) -> Result<(), BackendError> {
        tokio::fs::write(self.path_for(&document.handle), &document.content).await?;
        Ok(())
    }

    async fn get(&self, handle: &InvoiceHandle) -> Result<Option<Vec<u8>>, BackendError> {
        match tokio::fs::read(self.path_for(handle)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_core::booking::BookingId;

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("static").join("bills");
        let store = FsDocumentStore::new(&root).await.unwrap();
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(tmp.path()).await.unwrap();
        let handle = InvoiceHandle::parse("bill_20240101180000.pdf").unwrap();

        store
            .put(&InvoiceDocument {
                handle: handle.clone(),
                source_booking_id: BookingId::new("BK20240101180000"),
                content: b"%PDF-1.4".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(store.get(&handle).await.unwrap(), Some(b"%PDF-1.4".to_vec()));
    }

    #[tokio::test]
    async fn test_unknown_handle_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(tmp.path()).await.unwrap();
        let handle = InvoiceHandle::parse("bill_missing.pdf").unwrap();
        assert_eq!(store.get(&handle).await.unwrap(), None);
    }
}
