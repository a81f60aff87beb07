use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub pinyin: String,
    pub display_name: String,
}

/// Externally driven "what the user wants to see", typically derived from the
/// current route. May reference a pinyin the catalog has not loaded yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CategorySelection {
    pub pinyin: String,
    pub sub_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub id: u64,
    pub name: String,
    pub album_id: u64,
    pub duration_ms: Option<u64>,
    pub play_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumInfo {
    pub album_id: u64,
    pub album_name: String,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: u64,
    pub nickname: String,
    pub avatar_url: Option<String>,
}

/// Process-wide session state. Mutated only by session bootstrap (on success)
/// and teardown; the in-memory user and the persisted token move together,
/// never one without the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}
