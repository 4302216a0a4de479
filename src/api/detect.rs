use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::info;

use super::{
    ApiError, AppState, DetectAndRecommendRequest, DetectAndRecommendResponse, DetectRequest,
    DetectResponse, DetectUnconfiguredResponse, validation,
};
use crate::models::detection::Detection;

pub async fn detect_emotion(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    let detection = run_detection(&state, &request.image_data).await?;

    Ok(Json(DetectResponse {
        success: true,
        emotion: detection.emotion,
        confidence: detection.confidence,
        all_emotions: detection.all_emotions,
        face_detected: true,
    }))
}

pub async fn detect_and_recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DetectAndRecommendRequest>,
) -> Result<Response, ApiError> {
    let top_n = validation::validate_top_n(request.top_n)?;
    let language = validation::validate_language(request.language.as_deref())?;

    let detection = run_detection(&state, &request.image_data).await?;

    let recommender = match state.recommender() {
        Ok(recommender) => recommender,
        Err(error) => {
            // Surface the detection result even though recommendations are
            // unavailable without an API key.
            let body = DetectUnconfiguredResponse {
                success: false,
                error: error.to_string(),
                error_type: error.error_type(),
                emotion: detection.emotion,
                confidence: detection.confidence,
                all_emotions: detection.all_emotions,
                recommendations: vec![],
            };
            return Ok((StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response());
        }
    };

    let recommendations = recommender
        .recommendations(&detection.emotion, detection.confidence, top_n, language)
        .await;

    info!(
        emotion = %detection.emotion,
        confidence = detection.confidence,
        count = recommendations.len(),
        "Detection and recommendation complete"
    );

    let body = DetectAndRecommendResponse {
        success: true,
        emotion: detection.emotion,
        confidence: detection.confidence,
        all_emotions: detection.all_emotions,
        count: recommendations.len(),
        recommendations,
    };
    Ok(Json(body).into_response())
}

async fn run_detection(state: &AppState, image_data: &str) -> Result<Detection, ApiError> {
    let image =
        validation::decode_image_data(image_data, state.config().emotion.max_image_bytes)?;

    let detection = state
        .emotion()
        .detect(&image)
        .await
        .map_err(|e| ApiError::DetectionFailed(e.to_string()))?;

    if !detection.face_detected {
        return Err(match detection.error {
            Some(message) => ApiError::NoFaceDetected(message),
            None => ApiError::no_face(),
        });
    }

    Ok(detection)
}
