use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::services::recommender::Recommendation;

const fn default_top_n() -> usize {
    5
}

const fn default_confidence() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub image_data: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectAndRecommendRequest {
    pub image_data: String,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub emotion: String,

    #[serde(default = "default_confidence")]
    pub confidence: f64,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub success: bool,
    pub emotion: String,
    pub confidence: f64,
    pub all_emotions: HashMap<String, f64>,
    pub face_detected: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DetectAndRecommendResponse {
    pub success: bool,
    pub emotion: String,
    pub confidence: f64,
    pub all_emotions: HashMap<String, f64>,
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
}

/// 503 body for the combined endpoint when no API key is configured: the
/// detection result is still returned alongside the error.
#[derive(Debug, Serialize)]
pub struct DetectUnconfiguredResponse {
    pub success: bool,
    pub error: String,
    pub error_type: &'static str,
    pub emotion: String,
    pub confidence: f64,
    pub all_emotions: HashMap<String, f64>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub success: bool,
    pub languages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub youtube_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Stats,
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub song_count_by_emotion: HashMap<String, u64>,
    pub languages: Vec<String>,
    pub total_songs: u64,
}
