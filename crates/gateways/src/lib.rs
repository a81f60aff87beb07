use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use thiserror::Error;
use ting_shell_core::{AlbumInfo, Category, CategorySelection, Track, UserProfile};

mod channel;
mod file;
mod memory;

pub use channel::{ChannelCategoryGateway, ChannelPlaybackGateway};
pub use file::FileKeyStore;
pub use memory::MemoryKeyStore;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct SessionProfile {
    pub user: UserProfile,
    pub token: String,
}

/// Opaque string storage surviving process restarts, the localStorage of the
/// web client. Infallible by contract; implementations log their own I/O
/// trouble.
pub trait PersistentKeyStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn fetch_profile(&self) -> Result<SessionProfile, GatewayError>;
    async fn logout(&self) -> Result<(), GatewayError>;
}

pub trait CategoryGateway: Send + Sync {
    /// Full catalog, re-emitted wholesale on each (re)load.
    fn categories(&self) -> BoxStream<'static, Vec<Category>>;
    /// Route-driven selection; independent of catalog loading.
    fn selection(&self) -> BoxStream<'static, CategorySelection>;
}

pub trait PlaybackGateway: Send + Sync {
    fn track_list(&self) -> BoxStream<'static, Vec<Track>>;
    fn current_index(&self) -> BoxStream<'static, usize>;
    fn current_track(&self) -> BoxStream<'static, Option<Track>>;
    fn album(&self) -> BoxStream<'static, Option<AlbumInfo>>;
    fn playing(&self) -> BoxStream<'static, bool>;
    /// Discard the current queue and track state.
    fn clear(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::info!(path, "navigation requested");
    }
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(message, "notification");
    }

    fn error(&self, message: &str) {
        tracing::warn!(message, "notification");
    }
}

/// Stand-in for a missing session backend, in the spirit of running without
/// any usable provider: restore always fails, logout always succeeds.
pub struct NullSessionGateway;

#[async_trait]
impl SessionGateway for NullSessionGateway {
    async fn fetch_profile(&self) -> Result<SessionProfile, GatewayError> {
        Err(GatewayError::Unavailable(
            "no session backend configured".to_string(),
        ))
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

pub struct NullCategoryGateway;

impl CategoryGateway for NullCategoryGateway {
    fn categories(&self) -> BoxStream<'static, Vec<Category>> {
        stream::pending().boxed()
    }

    fn selection(&self) -> BoxStream<'static, CategorySelection> {
        stream::pending().boxed()
    }
}

pub struct NullPlaybackGateway;

impl PlaybackGateway for NullPlaybackGateway {
    fn track_list(&self) -> BoxStream<'static, Vec<Track>> {
        stream::pending().boxed()
    }

    fn current_index(&self) -> BoxStream<'static, usize> {
        stream::pending().boxed()
    }

    fn current_track(&self) -> BoxStream<'static, Option<Track>> {
        stream::pending().boxed()
    }

    fn album(&self) -> BoxStream<'static, Option<AlbumInfo>> {
        stream::pending().boxed()
    }

    fn playing(&self) -> BoxStream<'static, bool> {
        stream::pending().boxed()
    }

    fn clear(&self) {}
}
