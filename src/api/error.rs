use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    ImageError(String),

    NoFaceDetected(String),

    DetectionFailed(String),

    ConfigurationError,

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::ImageError(msg) => write!(f, "Could not decode image: {}", msg),
            ApiError::NoFaceDetected(msg) => write!(f, "{}", msg),
            ApiError::DetectionFailed(msg) => write!(f, "Emotion detection failed: {}", msg),
            ApiError::ConfigurationError => write!(
                f,
                "YouTube API key not configured. Please set YOUTUBE_API_KEY in .env file."
            ),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Error envelope returned to the browser. The `error_type` string lets
/// client code branch without parsing messages.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub error_type: &'static str,
}

impl ApiError {
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::ImageError(_) => "ImageError",
            ApiError::NoFaceDetected(_) => "NoFaceDetected",
            ApiError::DetectionFailed(_) => "DetectionFailed",
            ApiError::ConfigurationError => "ConfigurationError",
            ApiError::InternalError(_) => "InternalError",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_)
            | ApiError::ImageError(_)
            | ApiError::NoFaceDetected(_) => StatusCode::BAD_REQUEST,
            ApiError::DetectionFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::ConfigurationError => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        ApiError::ImageError(msg.into())
    }

    pub fn no_face() -> Self {
        ApiError::NoFaceDetected("No face detected in image".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::DetectionFailed(msg) => {
                tracing::warn!("Emotion inference failed: {}", msg);
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
            _ => {}
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            error_type: self.error_type(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
