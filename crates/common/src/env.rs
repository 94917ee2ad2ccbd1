//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage artifact can be created at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of the durable artifact exists.
///
/// A bare file name (no parent component) needs nothing. An unreadable
/// existing artifact is only warned about; the first load reports the details.
pub async fn ensure_artifact_dir(artifact: &Path) -> anyhow::Result<()> {
    if let Some(parent) = artifact.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        debug!(dir = %parent.display(), "artifact directory ready");
    }
    if let Ok(meta) = tokio::fs::metadata(artifact).await {
        if meta.is_dir() {
            warn!(path = %artifact.display(), "artifact path is a directory; saves will fail");
        }
    }
    Ok(())
}
