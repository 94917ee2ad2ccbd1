//! Runtime wiring
//!
//! Builds the todo service from storage configuration and applies the startup
//! policy for unreadable artifacts.

use std::sync::Arc;

use configs::StorageConfig;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::storage::{FileStore, SessionStore};
use crate::todo::{TodoService, TodoSettings};

/// Prepare the artifact directory, construct the service and hydrate it.
///
/// A decode or read failure fails startup when `strict_load` is set; otherwise
/// it is logged and the service starts empty. The next successful write
/// replaces the unreadable artifact.
pub async fn build_todo_service(cfg: &StorageConfig) -> anyhow::Result<Arc<TodoService>> {
    common::env::ensure_artifact_dir(&cfg.path).await?;
    let durable = Arc::new(FileStore::new(&cfg.path, cfg.encoding));
    let service = TodoService::new(SessionStore::new(), durable, TodoSettings::from(cfg));

    match service.hydrate().await {
        Ok(()) => {}
        Err(e @ (ServiceError::Decode { .. } | ServiceError::Load { .. })) if !cfg.strict_load => {
            warn!(error = %e, "todo artifact unreadable; starting with empty store");
        }
        Err(e) => return Err(e.into()),
    }
    info!(
        path = %cfg.path.display(),
        encoding = ?cfg.encoding,
        max_chars = cfg.max_content_chars,
        reload_on_read = cfg.reload_on_read,
        "todo service ready"
    );
    Ok(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_artifact;
    use configs::StorageEncoding;

    fn cfg(path: std::path::PathBuf, strict_load: bool) -> StorageConfig {
        StorageConfig {
            path,
            encoding: StorageEncoding::Json,
            strict_load,
            ..StorageConfig::default()
        }
    }

    #[tokio::test]
    async fn malformed_artifact_starts_empty_when_lenient() -> Result<(), anyhow::Error> {
        let path = temp_artifact("json");
        tokio::fs::write(&path, b"not json").await?;
        let svc = build_todo_service(&cfg(path.clone(), false)).await?;
        assert_eq!(svc.read(None).await, "");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_artifact_fails_when_strict() -> Result<(), anyhow::Error> {
        let path = temp_artifact("json");
        tokio::fs::write(&path, b"not json").await?;
        assert!(build_todo_service(&cfg(path.clone(), true)).await.is_err());
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn raw_artifact_with_stray_bytes_survives_startup() -> Result<(), anyhow::Error> {
        let path = temp_artifact("md");
        tokio::fs::write(&path, b"- [ ] caf\xe9 order\n- [ ] keep me\n").await?;
        let raw = StorageConfig { encoding: StorageEncoding::Raw, ..cfg(path.clone(), true) };
        let svc = build_todo_service(&raw).await?;
        assert!(svc.read(None).await.ends_with("- [ ] keep me\n"));

        // Rewriting goes through what was read, not an empty store.
        let current = svc.read(None).await;
        svc.write(None, format!("{current}- [ ] new\n")).await?;
        let on_disk = tokio::fs::read_to_string(&path).await?;
        assert!(on_disk.contains("- [ ] keep me\n- [ ] new\n"));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn hydrates_existing_artifact() -> Result<(), anyhow::Error> {
        let path = temp_artifact("json");
        tokio::fs::write(&path, br#"{"default": "- [ ] boot", "s": "- [ ] mine"}"#).await?;
        let svc = build_todo_service(&cfg(path.clone(), true)).await?;
        assert_eq!(svc.read(None).await, "- [ ] boot");
        assert_eq!(svc.read(Some("s")).await, "- [ ] mine");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
