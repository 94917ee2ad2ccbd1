use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use configs::StorageConfig;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::metrics;
use crate::storage::{DurableStore, SessionStore, StoreState};
use crate::todo::prompts;

/// Behavioural knobs for [`TodoService`].
#[derive(Clone, Copy, Debug)]
pub struct TodoSettings {
    pub max_content_chars: usize,
    pub reload_on_read: bool,
}

impl Default for TodoSettings {
    fn default() -> Self {
        Self { max_content_chars: configs::DEFAULT_MAX_CONTENT_CHARS, reload_on_read: true }
    }
}

impl From<&StorageConfig> for TodoSettings {
    fn from(cfg: &StorageConfig) -> Self {
        Self { max_content_chars: cfg.max_content_chars, reload_on_read: cfg.reload_on_read }
    }
}

/// Read/overwrite façade over the session store and its durable copy.
///
/// Writes are cache-then-persist: memory is updated first, then the artifact.
/// A failed save surfaces [`ServiceError::Persist`] but the new value stays
/// in memory. Empty content is an ordinary value, not a clear-to-fallback.
///
/// `persist` serializes everything that touches the artifact. A write holds
/// it across put, snapshot and save so disk order follows memory order; a
/// reload holds it across load and replace so it cannot resurrect older disk
/// content over a newer write. The state lock itself is never held during I/O.
pub struct TodoService {
    store: SessionStore,
    durable: Arc<dyn DurableStore>,
    settings: TodoSettings,
    persist: Mutex<()>,
    /// Memory holds writes the artifact does not.
    unsynced: AtomicBool,
}

impl TodoService {
    pub fn new(store: SessionStore, durable: Arc<dyn DurableStore>, settings: TodoSettings) -> Self {
        Self { store, durable, settings, persist: Mutex::new(()), unsynced: AtomicBool::new(false) }
    }

    pub fn settings(&self) -> TodoSettings {
        self.settings
    }

    /// Populate the session store from the artifact; used once at startup.
    pub async fn hydrate(&self) -> Result<(), ServiceError> {
        let _guard = self.persist.lock().await;
        let state = self.durable.load().await?;
        info!(
            location = %self.durable.location(),
            chars = state.fallback.chars().count(),
            sessions = state.sessions.len(),
            "todo store hydrated"
        );
        self.store.replace(state).await;
        Ok(())
    }

    /// Current content for `session`. Never fails: a failed reload serves the cached value.
    pub async fn read(&self, session: Option<&str>) -> String {
        if self.settings.reload_on_read {
            self.reload().await;
        }
        metrics::READS_TOTAL.inc();
        self.store.get(self.slot(session)).await
    }

    /// Replace the content for `session` and persist.
    pub async fn write(&self, session: Option<&str>, content: String) -> Result<String, ServiceError> {
        let chars = content.chars().count();
        if chars > self.settings.max_content_chars {
            metrics::VALIDATION_REJECTS_TOTAL.inc();
            warn!(chars, limit = self.settings.max_content_chars, "todo write rejected");
            return Err(ServiceError::content_too_long(chars, self.settings.max_content_chars));
        }
        let slot = self.slot(session);
        debug!(session = slot.unwrap_or("<fallback>"), chars, "todo write");

        let _guard = self.persist.lock().await;
        self.store.put(slot, content).await;
        metrics::WRITES_TOTAL.inc();
        let snapshot = self.store.snapshot().await;
        self.save(&snapshot).await?;
        Ok(format!("Updated ({chars} chars)"))
    }

    /// Empty the slot for `session` and persist.
    pub async fn clear(&self, session: Option<&str>) -> Result<String, ServiceError> {
        let slot = self.slot(session);
        let _guard = self.persist.lock().await;
        self.store.clear(slot).await;
        metrics::WRITES_TOTAL.inc();
        let snapshot = self.store.snapshot().await;
        self.save(&snapshot).await?;
        info!(session = slot.unwrap_or("<fallback>"), "todo list cleared");
        Ok("Cleared (0 chars)".to_string())
    }

    /// Known session identifiers; always empty when the artifact has no session dimension.
    pub async fn sessions(&self) -> Vec<String> {
        if !self.durable.supports_sessions() {
            return Vec::new();
        }
        self.store.sessions().await
    }

    /// The "process next todo item" prompt with the current list appended.
    pub async fn task_prompt(&self, session: Option<&str>) -> String {
        let content = self.read(session).await;
        prompts::todo_task_message(&content)
    }

    /// Without a session dimension on disk every identifier maps to the fallback slot.
    fn slot<'a>(&self, session: Option<&'a str>) -> Option<&'a str> {
        if self.durable.supports_sessions() {
            session
        } else {
            None
        }
    }

    async fn save(&self, snapshot: &StoreState) -> Result<(), ServiceError> {
        match self.durable.save(snapshot).await {
            Ok(()) => {
                self.unsynced.store(false, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.unsynced.store(true, Ordering::SeqCst);
                metrics::PERSIST_FAILURES_TOTAL.inc();
                warn!(location = %self.durable.location(), error = %e, "todo persisted in memory only");
                Err(e)
            }
        }
    }

    async fn reload(&self) {
        let Ok(_guard) = self.persist.try_lock() else {
            debug!("save in flight; serving cached todo state");
            return;
        };
        if self.unsynced.load(Ordering::SeqCst) {
            debug!("memory ahead of artifact; skipping reload");
            return;
        }
        match self.durable.load().await {
            Ok(state) => self.store.replace(state).await,
            Err(e) => {
                metrics::RELOAD_FAILURES_TOTAL.inc();
                warn!(location = %self.durable.location(), error = %e, "failed to reload todo artifact; serving cached");
            }
        }
    }
}
