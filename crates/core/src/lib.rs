pub mod config;
pub mod keys;
pub mod model;
pub mod nav;

pub use config::{AppConfig, ChannelConfig};
pub use model::{AlbumInfo, Category, CategorySelection, SessionState, Track, UserProfile};
