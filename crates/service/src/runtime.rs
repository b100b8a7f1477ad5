//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the frontend directory exists (warn only) and the data file's
/// directory is created.
pub async fn ensure_env(frontend_dir: &str, data_file: &Path) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir, data_file).await
}
