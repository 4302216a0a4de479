use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::info;

use super::{
    ApiError, AppState, LanguagesResponse, RecommendRequest, RecommendResponse, Stats,
    StatsResponse, validation,
};
use crate::services::recommender;

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    if request.emotion.trim().is_empty() {
        return Err(ApiError::validation("Emotion not provided"));
    }

    let top_n = validation::validate_top_n(request.top_n)?;
    let language = validation::validate_language(request.language.as_deref())?;

    let recommender = state.recommender()?;

    let recommendations = recommender
        .recommendations(&request.emotion, request.confidence, top_n, language)
        .await;

    info!(
        emotion = %request.emotion,
        count = recommendations.len(),
        "Recommendation complete"
    );

    Ok(Json(RecommendResponse {
        success: true,
        count: recommendations.len(),
        recommendations,
    }))
}

pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        success: true,
        languages: recommender::supported_languages(),
    })
}

pub async fn get_stats() -> Json<StatsResponse> {
    let song_count_by_emotion = recommender::song_count_by_emotion();
    let total_songs = song_count_by_emotion.values().sum();

    Json(StatsResponse {
        success: true,
        stats: Stats {
            song_count_by_emotion,
            languages: recommender::supported_languages(),
            total_songs,
        },
    })
}
