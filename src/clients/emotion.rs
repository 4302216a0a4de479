use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::EmotionConfig;
use crate::models::detection::Detection;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    image: &'a str,
}

/// Client for the external emotion-inference service.
///
/// The service accepts a base64-encoded face image and returns the detected
/// emotion label with per-class scores.
#[derive(Clone)]
pub struct EmotionClient {
    client: Client,
    inference_url: String,
    timeout: Duration,
}

impl EmotionClient {
    #[must_use]
    pub fn with_shared_client(config: &EmotionConfig, client: Client) -> Self {
        Self {
            client,
            inference_url: config.inference_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    pub async fn detect(&self, image: &[u8]) -> Result<Detection> {
        let encoded = BASE64.encode(image);

        let response = self
            .client
            .post(&self.inference_url)
            .timeout(self.timeout)
            .json(&InferenceRequest { image: &encoded })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Inference service error: {} - {}",
                status,
                body
            ));
        }

        let detection: Detection = response.json().await?;
        Ok(detection)
    }
}
