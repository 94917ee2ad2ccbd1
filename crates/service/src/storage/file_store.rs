use std::{
    collections::{BTreeMap, HashMap},
    io::ErrorKind,
    path::PathBuf,
};

use async_trait::async_trait;
use configs::StorageEncoding;
use tokio::fs;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::storage::{DurableStore, StoreState, DEFAULT_SESSION};

/// File-backed durable store.
///
/// `Raw` keeps the fallback slot as the whole file. `Json` keeps an object of
/// session identifier to content, with the fallback under [`DEFAULT_SESSION`].
/// Saves go to a sibling temporary file that is renamed over the target, so a
/// concurrent `load` sees either the old or the new artifact.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    encoding: StorageEncoding,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P, encoding: StorageEncoding) -> Self {
        Self { path: path.into(), encoding }
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<StoreState, ServiceError> {
        match self.encoding {
            // Raw text has no structure to violate; stray bytes must not hide the list.
            StorageEncoding::Raw => Ok(StoreState::single(String::from_utf8_lossy(&bytes))),
            StorageEncoding::Json => {
                let text = String::from_utf8(bytes).map_err(|e| self.decode_error(e))?;
                if text.trim().is_empty() {
                    return Ok(StoreState::default());
                }
                let mut sessions: HashMap<String, String> =
                    serde_json::from_str(&text).map_err(|e| self.decode_error(e))?;
                let fallback = sessions.remove(DEFAULT_SESSION).unwrap_or_default();
                Ok(StoreState { fallback, sessions })
            }
        }
    }

    fn encode(&self, state: &StoreState) -> Result<Vec<u8>, ServiceError> {
        match self.encoding {
            StorageEncoding::Raw => Ok(state.fallback.clone().into_bytes()),
            StorageEncoding::Json => {
                // Sorted keys keep the artifact diff-friendly.
                let mut map: BTreeMap<&str, &str> = state
                    .sessions
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                map.insert(DEFAULT_SESSION, state.fallback.as_str());
                serde_json::to_vec_pretty(&map).map_err(|e| ServiceError::Persist {
                    path: self.path.clone(),
                    source: e.into(),
                })
            }
        }
    }

    fn decode_error(&self, e: impl std::fmt::Display) -> ServiceError {
        ServiceError::Decode { path: self.path.clone(), reason: e.to_string() }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "todo".to_string());
        self.path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
    }

    async fn atomic_write(&self, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = self.temp_path();
        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn load(&self) -> Result<StoreState, ServiceError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "artifact does not exist; starting empty");
                return Ok(StoreState::default());
            }
            Err(source) => return Err(ServiceError::Load { path: self.path.clone(), source }),
        };
        if bytes.is_empty() {
            debug!(path = %self.path.display(), "artifact is empty");
            return Ok(StoreState::default());
        }
        let len = bytes.len();
        let state = self.decode(bytes)?;
        debug!(path = %self.path.display(), bytes = len, sessions = state.sessions.len(), "artifact loaded");
        Ok(state)
    }

    async fn save(&self, state: &StoreState) -> Result<(), ServiceError> {
        let data = self.encode(state)?;
        self.atomic_write(&data)
            .await
            .map_err(|source| ServiceError::Persist { path: self.path.clone(), source })?;
        info!(path = %self.path.display(), bytes = data.len(), sessions = state.sessions.len(), "artifact saved");
        Ok(())
    }

    fn supports_sessions(&self) -> bool {
        self.encoding == StorageEncoding::Json
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
