use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub youtube: YoutubeConfig,

    pub emotion: EmotionConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5001,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    pub base_url: String,

    /// Read from the `YOUTUBE_API_KEY` environment variable at startup,
    /// never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,

    /// How long search results stay fresh (default: 3600 = 1 hour)
    pub cache_ttl_seconds: u64,

    /// Videos fetched per language in a multilingual search (max 50)
    pub max_results_per_language: usize,

    /// Pause between per-language searches to stay friendly to the quota
    pub search_delay_ms: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            request_timeout_seconds: 10,
            cache_ttl_seconds: 3600,
            max_results_per_language: 10,
            search_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Endpoint of the external emotion-inference service.
    pub inference_url: String,

    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,

    /// Upload size cap for decoded images (default: 5 MiB)
    pub max_image_bytes: usize,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            inference_url: "http://localhost:8501/v1/emotion".to_string(),
            request_timeout_seconds: 10,
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            youtube: YoutubeConfig::default(),
            emotion: EmotionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Populate the process environment from a .env file if one exists.
        dotenvy::dotenv().ok();

        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        config.youtube.api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("moodtune").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".moodtune").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.emotion.inference_url.is_empty() {
            anyhow::bail!("Emotion inference URL cannot be empty");
        }

        if self.emotion.request_timeout_seconds == 0 || self.youtube.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeouts must be > 0");
        }

        if self.emotion.max_image_bytes == 0 {
            anyhow::bail!("Image size limit must be > 0");
        }

        if !(1..=50).contains(&self.youtube.max_results_per_language) {
            anyhow::bail!("max_results_per_language must be between 1 and 50");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.youtube.cache_ttl_seconds, 3600);
        assert_eq!(config.youtube.max_results_per_language, 10);
        assert_eq!(config.emotion.max_image_bytes, 5 * 1024 * 1024);
        assert!(config.observability.metrics_enabled);
        assert!(config.youtube.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[youtube]"));
        assert!(toml_str.contains("[emotion]"));
        // The API key comes from the environment and must never be written out.
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [youtube]
            cache_ttl_seconds = 60
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.youtube.cache_ttl_seconds, 60);

        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.youtube.max_results_per_language = 51;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.emotion.inference_url = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.youtube.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
