use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::StoreState;

/// Trait abstraction for the durable copy of the store.
/// Implementations can be file-backed, in-memory (tests), or remote.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the artifact. Absent or empty artifacts yield an empty state.
    async fn load(&self) -> Result<StoreState, ServiceError>;
    /// Replace the artifact with `state` in one logical operation.
    async fn save(&self, state: &StoreState) -> Result<(), ServiceError>;
    /// Whether the encoding keeps a session dimension across restarts.
    fn supports_sessions(&self) -> bool;
    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}
