/// CLI settings
use serde::Deserialize;
use std::path::{Path, PathBuf};
use waveline_playback::PlaybackConfig;
use waveline_server_client::{ServerConfig, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerSettings {
    pub fn client_config(&self) -> ServerConfig {
        ServerConfig {
            url: self.url.clone(),
            access_token: self.access_token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Environment variables use the `WAVELINE_` prefix and `__` between
    /// section and key, e.g. `WAVELINE_SERVER__ACCESS_TOKEN`.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("waveline.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("WAVELINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings.build()?.try_deserialize()
    }
}

// Default values
fn default_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
