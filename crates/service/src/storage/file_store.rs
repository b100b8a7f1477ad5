use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::DocumentStore;
use crate::errors::ServiceError;

/// Document written to a single file on disk.
///
/// Writes go to a sibling temp file that is then persisted over the target, so
/// a reader sees either the old document or the new one, never a partial one.
/// A temp file left by a failed write is removed when it is dropped.
#[derive(Clone, Debug)]
pub struct FileDocumentStore {
    file_path: PathBuf,
}

impl FileDocumentStore {
    /// Open the store at `path`. Creates parent directories and seeds the file
    /// with `initial` if it does not exist yet; existing contents are left as is.
    pub async fn new<P: Into<PathBuf>>(path: P, initial: &[u8]) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = non_empty_parent(&file_path) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        match fs::metadata(&file_path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&file_path, initial).await.map_err(ServiceError::storage)?;
                info!(path = %file_path.display(), "initialized empty store file");
            }
            Err(e) => return Err(ServiceError::storage(e)),
        }

        Ok(Arc::new(Self { file_path }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

// Blocking: run on the blocking pool.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ServiceError> {
    // same directory, so the final rename never crosses filesystems
    let dir = non_empty_parent(path).unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".items-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(ServiceError::storage)?;
    tmp.write_all(bytes).map_err(ServiceError::storage)?;
    tmp.as_file().sync_all().map_err(ServiceError::storage)?;
    tmp.persist(path).map_err(|e| ServiceError::storage(e.error))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn read(&self) -> Result<Option<Vec<u8>>, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::storage(e)),
        }
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<(), ServiceError> {
        let target = self.file_path.clone();
        let len = bytes.len();
        tokio::task::spawn_blocking(move || write_atomic(&target, &bytes))
            .await
            .map_err(ServiceError::storage)??;
        debug!(path = %self.file_path.display(), bytes = len, "store file replaced");
        Ok(())
    }

    fn describe(&self) -> String {
        self.file_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_missing_file_and_creates_dirs() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested/items.json");
        let store = FileDocumentStore::new(&path, b"[]").await?;

        assert_eq!(store.read().await?, Some(b"[]".to_vec()));
        assert_eq!(store.path(), path.as_path());
        Ok(())
    }

    #[tokio::test]
    async fn keeps_existing_contents() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.json");
        tokio::fs::write(&path, br#"[{"id":1}]"#).await?;

        let store = FileDocumentStore::new(&path, b"[]").await?;
        assert_eq!(store.read().await?, Some(br#"[{"id":1}]"#.to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn write_replaces_and_leaves_no_temp_files() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.json");
        let store = FileDocumentStore::new(&path, b"[]").await?;

        store.write(b"[1]".to_vec()).await?;
        store.write(b"[1,2]".to_vec()).await?;

        // reopen to make sure it hit the disk
        let reopened = FileDocumentStore::new(&path, b"[]").await?;
        assert_eq!(reopened.read().await?, Some(b"[1,2]".to_vec()));

        let mut entries = tokio::fs::read_dir(dir.path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["items.json".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.json");
        let store = FileDocumentStore::new(&path, b"[]").await?;

        // a directory in place of the target makes the final rename fail
        tokio::fs::remove_file(&path).await?;
        tokio::fs::create_dir(&path).await?;
        tokio::fs::write(path.join("keep"), b"x").await?;
        assert!(matches!(store.write(b"[1]".to_vec()).await, Err(ServiceError::Storage(_))));

        let mut entries = tokio::fs::read_dir(dir.path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["items.json".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn read_reports_none_when_file_removed() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.json");
        let store = FileDocumentStore::new(&path, b"[]").await?;
        tokio::fs::remove_file(&path).await?;
        assert!(store.read().await?.is_none());
        Ok(())
    }
}
