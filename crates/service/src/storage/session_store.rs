use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Reserved identifier naming the fallback slot.
pub const DEFAULT_SESSION: &str = "default";

/// Full contents of the store: one entry per session plus the fallback slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreState {
    pub fallback: String,
    pub sessions: HashMap<String, String>,
}

impl StoreState {
    /// A state holding only the fallback slot.
    pub fn single(content: impl Into<String>) -> Self {
        Self { fallback: content.into(), sessions: HashMap::new() }
    }

    pub fn get(&self, session: Option<&str>) -> &str {
        match slot_key(session) {
            Some(key) => self.sessions.get(key).map(String::as_str).unwrap_or(&self.fallback),
            None => &self.fallback,
        }
    }

    pub fn put(&mut self, session: Option<&str>, content: String) {
        match slot_key(session) {
            Some(key) => {
                self.sessions.insert(key.to_string(), content);
            }
            None => self.fallback = content,
        }
    }
}

/// Maps a caller-supplied identifier to a session key, or `None` for the fallback slot.
pub(crate) fn slot_key(session: Option<&str>) -> Option<&str> {
    session.filter(|s| !s.is_empty() && *s != DEFAULT_SESSION)
}

/// In-memory session store.
///
/// One coarse lock guards the whole state: reads share it, mutations hold it
/// exclusively for the duration of a map update only. Callers never hold it
/// across disk I/O; they take a [`SessionStore::snapshot`] and persist the copy.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<StoreState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content for `session`; unknown sessions read through to the fallback.
    pub async fn get(&self, session: Option<&str>) -> String {
        let state = self.inner.read().await;
        state.get(session).to_string()
    }

    /// Create or replace the content of `session` (or the fallback slot).
    pub async fn put(&self, session: Option<&str>, content: String) {
        let mut state = self.inner.write().await;
        state.put(session, content);
    }

    /// Set the targeted slot to empty content.
    pub async fn clear(&self, session: Option<&str>) {
        self.put(session, String::new()).await;
    }

    /// Copy of the full state, taken under the shared lock.
    pub async fn snapshot(&self) -> StoreState {
        self.inner.read().await.clone()
    }

    /// Swap in a freshly loaded state.
    pub async fn replace(&self, state: StoreState) {
        *self.inner.write().await = state;
    }

    /// Known session identifiers, sorted. The fallback slot is not listed.
    pub async fn sessions(&self) -> Vec<String> {
        let state = self.inner.read().await;
        let mut ids: Vec<String> = state.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_and_empty_target_fallback() {
        let store = SessionStore::new();
        store.put(None, "- [ ] a".into()).await;
        assert_eq!(store.get(None).await, "- [ ] a");
        assert_eq!(store.get(Some("")).await, "- [ ] a");

        store.put(Some(""), "- [ ] b".into()).await;
        assert_eq!(store.get(None).await, "- [ ] b");
        assert!(store.sessions().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_session_reads_through_to_fallback() {
        let store = SessionStore::new();
        store.put(None, "shared".into()).await;
        assert_eq!(store.get(Some("never-written")).await, "shared");
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.put(Some("s1"), "A".into()).await;
        store.put(Some("s2"), "B".into()).await;
        assert_eq!(store.get(Some("s1")).await, "A");
        assert_eq!(store.get(Some("s2")).await, "B");
        assert_eq!(store.get(None).await, "");
        assert_eq!(store.sessions().await, vec!["s1".to_string(), "s2".to_string()]);
    }

    #[tokio::test]
    async fn put_replaces_never_appends() {
        let store = SessionStore::new();
        store.put(Some("s"), "first".into()).await;
        store.put(Some("s"), "second".into()).await;
        assert_eq!(store.get(Some("s")).await, "second");
        assert_eq!(store.snapshot().await.sessions.len(), 1);
    }

    #[tokio::test]
    async fn reserved_name_addresses_fallback() {
        let store = SessionStore::new();
        store.put(Some(DEFAULT_SESSION), "via name".into()).await;
        assert_eq!(store.get(None).await, "via name");
        assert!(store.sessions().await.is_empty());
    }

    #[tokio::test]
    async fn clear_keeps_session_known() {
        let store = SessionStore::new();
        store.put(None, "fallback".into()).await;
        store.put(Some("s"), "work".into()).await;
        store.clear(Some("s")).await;
        // An emptied session is still a session; it does not fall back.
        assert_eq!(store.get(Some("s")).await, "");
        assert_eq!(store.sessions().await, vec!["s".to_string()]);
    }

    #[tokio::test]
    async fn replace_swaps_whole_state() {
        let store = SessionStore::new();
        store.put(Some("old"), "x".into()).await;
        let mut next = StoreState::single("fresh");
        next.sessions.insert("new".into(), "y".into());
        store.replace(next.clone()).await;
        assert_eq!(store.snapshot().await, next);
        assert_eq!(store.get(Some("old")).await, "fresh");
    }
}
