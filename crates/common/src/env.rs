//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure expected directories exist; warn on missing optional ones.
///
/// `data_file` is the store document; its parent directory is created so the
/// store can seed the file on first run.
pub async fn ensure_env(frontend_dir: &str, data_file: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; landing page will 404");
    }
    match data_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_parent_of_data_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let data_file = dir.path().join("nested/store/items.json");
        ensure_env("does-not-exist", &data_file).await?;
        assert!(dir.path().join("nested/store").is_dir());
        assert!(!data_file.exists());
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_needs_no_directory() -> anyhow::Result<()> {
        ensure_env("does-not-exist", Path::new("items.json")).await?;
        Ok(())
    }
}
