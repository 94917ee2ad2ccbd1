#![cfg(test)]
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::storage::{DurableStore, StoreState};

/// Unique artifact path under the system temp dir; the file is not created.
pub fn temp_artifact(ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("todo_store_{}.{ext}", uuid::Uuid::new_v4()))
}

/// In-memory durable store whose saves can be switched to fail.
#[derive(Default)]
pub struct MemoryStore {
    pub disk: Mutex<StoreState>,
    pub fail_saves: AtomicBool,
    pub fail_loads: AtomicBool,
    pub saves: AtomicUsize,
    pub keyed: bool,
}

impl MemoryStore {
    pub fn keyed() -> Self {
        Self { keyed: true, ..Self::default() }
    }

    pub async fn disk(&self) -> StoreState {
        self.disk.lock().await.clone()
    }

    pub async fn set_disk(&self, state: StoreState) {
        *self.disk.lock().await = state;
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn load(&self) -> Result<StoreState, ServiceError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(ServiceError::Decode {
                path: PathBuf::from("memory"),
                reason: "injected load failure".into(),
            });
        }
        Ok(self.disk.lock().await.clone())
    }

    async fn save(&self, state: &StoreState) -> Result<(), ServiceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ServiceError::Persist {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected save failure"),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.disk.lock().await = state.clone();
        Ok(())
    }

    fn supports_sessions(&self) -> bool {
        self.keyed
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
