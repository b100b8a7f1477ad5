use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::errors::ServiceError;

/// In-process document, for tests and the `memory` backend.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Option<Vec<u8>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given raw contents, valid or not.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self { inner: RwLock::new(Some(bytes.into())) }
    }

    pub async fn contents(&self) -> Option<Vec<u8>> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read(&self) -> Result<Option<Vec<u8>>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<(), ServiceError> {
        *self.inner.write().await = Some(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_then_holds_last_write() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        assert!(store.read().await?.is_none());

        store.write(b"[1]".to_vec()).await?;
        store.write(b"[2]".to_vec()).await?;
        assert_eq!(store.read().await?, Some(b"[2]".to_vec()));
        Ok(())
    }
}
