use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    pub platform: PlatformConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API.
    pub base_url: String,
    /// Optional API key stored in config (env var takes priority at runtime).
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// How many activities to request per refresh.
    pub activity_limit: usize,
    /// Capacity of the in-memory activity log ring buffer.
    pub log_capacity: usize,
    /// Default number of hits requested from vector search.
    pub default_top_k: usize,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            platform: PlatformConfig {
                base_url: "http://localhost:8080".to_string(),
                api_key: None,
                app_id: String::new(),
                app_name: "Pulse Console".to_string(),
            },
            client: ClientConfig {
                activity_limit: 20,
                log_capacity: 100,
                default_top_k: 5,
            },
        }
    }
}
