use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use shared::{domain::Talk, error::StoreError};

mod in_memory;
#[cfg(test)]
use in_memory::FAILURE_MESSAGES;
pub use in_memory::{demo_talks, InMemoryOptions, InMemoryTalkClient};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Source of truth for the talk collection.
///
/// Reducers never read the backing collection directly: they observe it through
/// [`TalkClient::talks_stream`] and change it through `load`/`save`.
#[async_trait]
pub trait TalkClient: Send + Sync {
    /// Suggests a title for a new talk.
    async fn fetch_suggested(&self) -> Result<String>;

    /// Live view of the full collection. Yields the current collection first,
    /// then every replacement. Never ends while the client is alive.
    fn talks_stream(&self) -> BoxStream<'static, Vec<Talk>>;

    /// Asks the store to refresh. Success has no payload: refreshed data shows
    /// up on [`TalkClient::talks_stream`].
    async fn load(&self) -> Result<()>;

    async fn save(&self, talks: Vec<Talk>) -> Result<()>;
}

/// Client used when no store is wired up. Every request fails and the stream
/// finishes immediately.
pub struct MissingTalkClient;

#[async_trait]
impl TalkClient for MissingTalkClient {
    async fn fetch_suggested(&self) -> Result<String> {
        Err(StoreError::transient("talk store unavailable: fetch_suggested"))
    }

    fn talks_stream(&self) -> BoxStream<'static, Vec<Talk>> {
        stream::empty().boxed()
    }

    async fn load(&self) -> Result<()> {
        Err(StoreError::transient("talk store unavailable: load"))
    }

    async fn save(&self, _talks: Vec<Talk>) -> Result<()> {
        Err(StoreError::transient("talk store unavailable: save"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
