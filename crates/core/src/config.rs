use serde::{Deserialize, Serialize};

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub gateway_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { gateway_buffer: 16 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub album_path_prefix: String,
    pub state_file: Option<String>,
    pub log_level: String,
    pub channels: ChannelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            album_path_prefix: "/albums/".to_string(),
            state_file: None,
            log_level: "info".to_string(),
            channels: ChannelConfig::default(),
        }
    }
}
