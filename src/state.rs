use std::sync::Arc;

use crate::clients::emotion::EmotionClient;
use crate::clients::youtube::YouTubeClient;
use crate::config::Config;
use crate::services::Recommender;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client is reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("moodtune/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

pub struct SharedState {
    pub config: Config,

    pub emotion: EmotionClient,

    /// Present only when a YouTube API key was configured; handlers turn
    /// its absence into a `ConfigurationError` response.
    pub recommender: Option<Recommender>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client()?;

        let emotion = EmotionClient::with_shared_client(&config.emotion, http_client.clone());

        let recommender = config.youtube.api_key.clone().map(|api_key| {
            let youtube = Arc::new(YouTubeClient::with_shared_client(
                &config.youtube,
                api_key,
                http_client,
            ));
            Recommender::new(youtube)
        });

        Ok(Self {
            config,
            emotion,
            recommender,
        })
    }

    #[must_use]
    pub const fn youtube_configured(&self) -> bool {
        self.recommender.is_some()
    }
}
